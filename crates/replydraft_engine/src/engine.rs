use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use futures_util::future::join_all;
use replydraft_core::{DraftId, GenerationRequest};
use replydraft_logging::{draft_debug, draft_error, draft_info, draft_warn};

use crate::generate::{reconcile_batch, EventSink, Generator};
use crate::{BatchMode, EngineEvent, EngineSettings, FailureKind, GenerationError};

enum EngineCommand {
    Generate(GenerationRequest),
    GenerateBatch(Vec<GenerationRequest>),
}

/// Runs generation requests on a background tokio runtime and reports every
/// outcome to an `EventSink`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        generator: Arc<dyn Generator>,
        settings: EngineSettings,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("replydraft-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let generator = generator.clone();
                    let sink = sink.clone();
                    let mode = settings.batch_mode;
                    runtime.spawn(async move {
                        handle_command(generator, mode, command, sink).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn generate(&self, request: GenerationRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Generate(request));
    }

    pub fn generate_batch(&self, requests: Vec<GenerationRequest>) {
        let _ = self.cmd_tx.send(EngineCommand::GenerateBatch(requests));
    }
}

async fn handle_command(
    generator: Arc<dyn Generator>,
    mode: BatchMode,
    command: EngineCommand,
    sink: Arc<dyn EventSink>,
) {
    match command {
        EngineCommand::Generate(request) => {
            run_generation(generator, request, sink).await;
        }
        EngineCommand::GenerateBatch(requests) => {
            let draft_ids: Vec<DraftId> = requests.iter().map(|request| request.draft_id).collect();
            let batch = tokio::spawn(run_batch(generator, mode, requests, sink.clone()));
            if let Err(err) = batch.await {
                // Drafts that already settled ignore these late failures.
                draft_error!("Batch orchestration failed: {}", err);
                for draft_id in &draft_ids {
                    sink.emit(EngineEvent::GenerationCompleted {
                        draft_id: *draft_id,
                        result: Err(aborted()),
                    });
                }
                sink.emit(EngineEvent::BatchFinished {
                    drafted: 0,
                    failed: draft_ids.len(),
                });
            }
        }
    }
}

/// Generates one draft and reports its outcome.
pub async fn run_generation(
    generator: Arc<dyn Generator>,
    request: GenerationRequest,
    sink: Arc<dyn EventSink>,
) -> bool {
    let draft_id = request.draft_id;
    draft_debug!("Generating draft {} for {}", draft_id, request.source_url);
    let task = tokio::spawn(async move { generator.generate(&request).await });
    let result = match task.await {
        Ok(result) => result,
        Err(err) => {
            draft_error!("Generation task for draft {} aborted: {}", draft_id, err);
            Err(aborted())
        }
    };
    report(sink.as_ref(), draft_id, result)
}

/// Generates every request of a batch, then reports `BatchFinished`.
///
/// In per-item mode every request is in flight at once and outcomes are
/// reported in completion order. One draft's failure never affects another's.
pub async fn run_batch(
    generator: Arc<dyn Generator>,
    mode: BatchMode,
    requests: Vec<GenerationRequest>,
    sink: Arc<dyn EventSink>,
) {
    draft_info!("Batch of {} drafts started ({:?})", requests.len(), mode);
    let outcomes: Vec<bool> = match mode {
        BatchMode::PerItem => {
            join_all(
                requests
                    .into_iter()
                    .map(|request| run_generation(generator.clone(), request, sink.clone())),
            )
            .await
        }
        BatchMode::Combined => {
            let result = generator.generate_batch(&requests).await;
            let pairs: Vec<(DraftId, Result<String, GenerationError>)> = match result {
                Ok(replies) => reconcile_batch(&requests, replies),
                Err(err) => {
                    draft_warn!("Combined batch call failed: {}", err);
                    requests
                        .iter()
                        .map(|request| (request.draft_id, Err(err.clone())))
                        .collect()
                }
            };
            pairs
                .into_iter()
                .map(|(draft_id, result)| report(sink.as_ref(), draft_id, result))
                .collect()
        }
    };

    let drafted = outcomes.iter().filter(|ok| **ok).count();
    let failed = outcomes.len() - drafted;
    draft_info!("Batch finished: {} drafted, {} failed", drafted, failed);
    sink.emit(EngineEvent::BatchFinished { drafted, failed });
}

fn report(sink: &dyn EventSink, draft_id: DraftId, result: Result<String, GenerationError>) -> bool {
    let ok = result.is_ok();
    if let Err(err) = &result {
        draft_warn!("Draft {} failed ({}): {}", draft_id, err.kind, err.message);
    }
    sink.emit(EngineEvent::GenerationCompleted { draft_id, result });
    ok
}

fn aborted() -> GenerationError {
    GenerationError::new(FailureKind::TaskAborted, FailureKind::TaskAborted.to_string())
}
