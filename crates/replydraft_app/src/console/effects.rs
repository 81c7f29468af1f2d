use std::io;
use std::sync::{mpsc, Arc};

use replydraft_core::{Effect, GenerationOutcome, Msg};
use replydraft_engine::{EngineEvent, EngineHandle, EngineSettings, EventSink, Generator};
use replydraft_logging::draft_info;

use super::app::LoopEvent;

/// Hands core effects to the engine; engine events come back as `Msg`s on the
/// console loop's channel.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        generator: Arc<dyn Generator>,
        settings: EngineSettings,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> io::Result<Self> {
        let sink = Arc::new(MsgSink { tx: loop_tx });
        let engine = EngineHandle::spawn(generator, settings, sink)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Generate(request) => {
                    draft_info!(
                        "Generate draft_id={} url={}",
                        request.draft_id,
                        request.source_url
                    );
                    self.engine.generate(request);
                }
                Effect::GenerateBatch { requests } => {
                    draft_info!("GenerateBatch size={}", requests.len());
                    self.engine.generate_batch(requests);
                }
            }
        }
    }
}

struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(LoopEvent::Ui(engine_event_to_msg(event)));
    }
}

fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::GenerationCompleted { draft_id, result } => Msg::GenerationDone {
            draft_id,
            outcome: match result {
                Ok(text) => GenerationOutcome::Drafted(text),
                Err(err) => GenerationOutcome::Failed(err.message),
            },
        },
        EngineEvent::BatchFinished { .. } => Msg::BatchFinished,
    }
}
