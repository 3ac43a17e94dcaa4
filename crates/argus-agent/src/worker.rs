//! Background worker for long-running investigations

use crate::agent::{CycleOutcome, InvestigationSummary, Investigator, StopReason};
use crate::memory::{ExpansionMemory, InvestigationMemory};
use crate::AgentError;
use std::future::Future;
use tokio::time::{interval, Duration};

/// Runs an investigation off the async runtime
///
/// The worker is the single owner of the investigator and its graph. Each
/// cycle runs on a blocking task, so slow collaborators never stall the
/// runtime. Shutdown is only honored between cycles; an in-flight expansion
/// always finishes and leaves a consistent graph.
///
/// # Examples
///
/// ```no_run
/// use argus_agent::{InvestigationConfig, InvestigationWorker, Investigator, PipelineRunner};
/// use argus_store::KnowledgeGraph;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = InvestigationConfig::default();
///     let investigator = Investigator::new(KnowledgeGraph::new(), PipelineRunner::new(), &config);
///     let mut worker = InvestigationWorker::new(investigator);
///
///     // Run until exhausted, out of budget, or Ctrl+C
///     let summary = worker.run_until_ctrl_c().await?;
///     println!("{:?}", summary.stop_reason);
///     Ok(())
/// }
/// ```
pub struct InvestigationWorker<M = InvestigationMemory> {
    investigator: Option<Investigator<M>>,
    interval: Duration,
    max_cycles: usize,
}

impl<M: ExpansionMemory + 'static> InvestigationWorker<M> {
    /// Wrap an investigator, taking pacing and budget from its settings
    pub fn new(investigator: Investigator<M>) -> Self {
        let interval = investigator.settings().cycle_interval();
        let max_cycles = investigator.settings().max_cycles;
        Self {
            investigator: Some(investigator),
            interval,
            max_cycles,
        }
    }

    /// Override the cycle budget
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Run until exhausted, out of budget, or `shutdown` completes
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Worker`] if a cycle task panicked. The
    /// investigator is lost in that case.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<InvestigationSummary, AgentError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        // A zero period would panic in tokio::time::interval
        let mut ticker = (!self.interval.is_zero()).then(|| interval(self.interval));

        tracing::info!(
            "Investigation worker started (interval: {:?}, max cycles: {})",
            self.interval,
            self.max_cycles
        );

        let mut cycles = 0;
        let stop_reason = loop {
            if cycles >= self.max_cycles {
                break StopReason::CycleLimit;
            }

            let cancelled = match ticker.as_mut() {
                Some(ticker) => tokio::select! {
                    biased;
                    _ = &mut shutdown => true,
                    _ = ticker.tick() => false,
                },
                None => tokio::select! {
                    biased;
                    _ = &mut shutdown => true,
                    _ = std::future::ready(()) => false,
                },
            };
            if cancelled {
                tracing::info!("Shutdown signal received, stopping investigation");
                break StopReason::Cancelled;
            }

            match self.step().await? {
                CycleOutcome::Exhausted => break StopReason::Exhausted,
                _ => cycles += 1,
            }
        };

        if let Some(investigator) = &self.investigator {
            tracing::info!(
                "Investigation stopped ({:?}). Final metrics:\n{}",
                stop_reason,
                investigator.metrics().summary()
            );
        }

        Ok(InvestigationSummary { cycles, stop_reason })
    }

    /// Run until exhausted, out of budget, or Ctrl+C
    pub async fn run_until_ctrl_c(&mut self) -> Result<InvestigationSummary, AgentError> {
        self.run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run a single cycle on a blocking task
    pub async fn step(&mut self) -> Result<CycleOutcome, AgentError> {
        let mut investigator = self
            .investigator
            .take()
            .ok_or_else(|| AgentError::Worker("investigator lost to an earlier panic".to_string()))?;

        let (investigator, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = investigator.run_cycle();
            (investigator, outcome)
        })
        .await
        .map_err(|e| {
            tracing::error!("Investigation cycle failed: {}", e);
            AgentError::Worker(e.to_string())
        })?;

        self.investigator = Some(investigator);
        Ok(outcome)
    }

    /// The investigator, unless a cycle panicked
    pub fn investigator(&self) -> Option<&Investigator<M>> {
        self.investigator.as_ref()
    }

    /// Stop the worker and hand the investigator back
    pub fn into_investigator(self) -> Option<Investigator<M>> {
        self.investigator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvestigationConfig, PipelineRunner};
    use argus_domain::{Node, NodeType};
    use argus_store::KnowledgeGraph;

    fn worker_with_asns(count: usize) -> InvestigationWorker {
        let config = InvestigationConfig::default();
        let mut investigator = Investigator::new(KnowledgeGraph::new(), PipelineRunner::new(), &config);
        for i in 0..count {
            investigator
                .seed(Node::new(NodeType::Asn, format!("AS6450{i}"), "user_upload", 0.8).unwrap())
                .unwrap();
        }
        InvestigationWorker::new(investigator)
    }

    #[tokio::test]
    async fn test_runs_until_exhausted() {
        let mut worker = worker_with_asns(3);

        let summary = worker.run(std::future::pending()).await.unwrap();

        assert_eq!(summary, InvestigationSummary { cycles: 3, stop_reason: StopReason::Exhausted });
        assert_eq!(worker.investigator().unwrap().visited_count(), 3);
    }

    #[tokio::test]
    async fn test_cycle_limit() {
        let mut worker = worker_with_asns(3).with_max_cycles(2);

        let summary = worker.run(std::future::pending()).await.unwrap();

        assert_eq!(summary.stop_reason, StopReason::CycleLimit);
        assert_eq!(summary.cycles, 2);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_cycle() {
        let mut worker = worker_with_asns(3);

        let summary = worker.run(std::future::ready(())).await.unwrap();

        assert_eq!(summary, InvestigationSummary { cycles: 0, stop_reason: StopReason::Cancelled });
        assert_eq!(worker.investigator().unwrap().visited_count(), 0);
    }

    #[tokio::test]
    async fn test_step() {
        let mut worker = worker_with_asns(1);
        assert!(matches!(worker.step().await.unwrap(), CycleOutcome::Skipped { .. }));
        assert_eq!(worker.step().await.unwrap(), CycleOutcome::Exhausted);
        assert!(worker.into_investigator().is_some());
    }
}
