use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::capabilities::{Capabilities, GenerateOperation, GenerationResult};
use crate::event::Event;
use crate::ingest::encode_batch;
use crate::model::{GeneratedPost, Model, PhaseTransition, ToastKind};
use crate::selection::select_images;
use crate::view::{build_view, ViewModel};
use crate::{AppError, UnixTimeMs, FALLBACK_POST_TEXT};

#[derive(Default)]
pub struct App;

impl App {
    /// Samples the library, moves to `Generating` and asks the shell for copy.
    fn start_generation(model: &mut Model, caps: &Capabilities) {
        if model.images.is_empty() {
            warn!("generate requested with an empty library; ignoring");
            return;
        }

        let next = match model.phase.next(PhaseTransition::Start) {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "generate requested while a request is in flight; ignoring");
                return;
            }
        };

        let selected = select_images(model.images.as_slice(), &mut model.rng);
        let operation = GenerateOperation::new(&model.config, selected.iter().map(|img| &**img));

        info!(
            selected = selected.len(),
            library = model.images.len(),
            model = %model.config.model,
            "requesting generated post"
        );

        model.phase = next;
        model.current_post = None;
        model.pending_selection = Some(selected);
        model.copied_at = None;
        model.clear_error();

        caps.content_generator.generate(operation, Event::PostGenerated);
    }

    fn finish_generation(model: &mut Model, result: GenerationResult) {
        let Some(selected) = model.pending_selection.take() else {
            warn!("generation result arrived with no request in flight; dropping");
            return;
        };

        match result {
            Ok(text) => match model.phase.next(PhaseTransition::Succeed) {
                Ok(next) => {
                    let content = if text.trim().is_empty() {
                        warn!("generator returned no text; using fallback");
                        FALLBACK_POST_TEXT.to_string()
                    } else {
                        text
                    };
                    let post = GeneratedPost::new(content, selected);
                    info!(post_id = %post.id, images = post.selected_images.len(), "post generated");
                    model.current_post = Some(post);
                    model.phase = next;
                }
                Err(e) => error!(error = %e, "unexpected generation result"),
            },
            Err(cause) => match model.phase.next(PhaseTransition::Fail) {
                Ok(next) => {
                    error!(error = %cause, "post generation failed");
                    model.current_post = None;
                    model.set_error(AppError::from(cause));
                    model.phase = next;
                }
                Err(e) => error!(error = %e, "unexpected generation failure"),
            },
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        model.update_timestamp();
        debug!(event = event.name(), phase = %model.phase, "update");

        match event {
            Event::Noop => {}

            Event::Tick => {
                if model.copied_at.is_some() && !model.is_copy_confirmed() {
                    model.copied_at = None;
                }
                caps.render.render();
            }

            Event::ImagesSelected { files, failures } => {
                let report = encode_batch(files, failures);
                let skipped = report.failures.len();
                if let Some(message) = report.skipped_message() {
                    model.show_toast(message, ToastKind::Warning);
                }
                let added = model.images.append_batch(report.images);
                info!(added, skipped, "upload batch ingested");
                caps.render.render();
            }

            Event::RemoveImage { id } => {
                if model.images.remove(&id).is_none() {
                    debug!(%id, "remove requested for unknown image");
                }
                caps.render.render();
            }

            Event::GeneratePost => {
                Self::start_generation(model, caps);
                caps.render.render();
            }

            Event::PostGenerated(result) => {
                Self::finish_generation(model, result);
                caps.render.render();
            }

            Event::CopyPostRequested => {
                let Some(post) = &model.current_post else {
                    debug!("copy requested with no post");
                    return;
                };
                caps.clipboard
                    .write_text(post.content.clone(), Event::CopyCompleted);
            }

            Event::CopyCompleted(Ok(())) => {
                model.copied_at = Some(UnixTimeMs(model.view_timestamp_ms));
                caps.render.render();
            }

            Event::CopyCompleted(Err(e)) => {
                warn!(error = %e, "clipboard write failed");
                model.copied_at = None;
                model.show_toast(AppError::from(e).user_facing_message(), ToastKind::Error);
                caps.render.render();
            }

            Event::ConfigureGenerator(config) => {
                match config.validate() {
                    Ok(()) => {
                        info!(model = %config.model, "generator configured");
                        model.config = config;
                    }
                    Err(e) => {
                        warn!(error = %e, "rejected generator config");
                        model.show_toast(AppError::from(e).user_facing_message(), ToastKind::Error);
                    }
                }
                caps.render.render();
            }

            Event::SeedSelection { seed } => {
                model.rng = StdRng::seed_from_u64(seed);
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        build_view(model)
    }
}
