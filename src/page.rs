use crate::annotator::{AnnotatorTask, InteractiveAnnotator};
use crate::client::SolveService;
use crate::controller::{ClueSubmission, RequestController, Settlement, SolveMode, Ticket};
use crate::error::{SolveError, ValidationError};
use crate::layout::Layout;
use crate::model::SolveResult;
use crate::renderer::{self, ResultRenderer};
use crate::surface::Surface;
use crate::timeline::Timeline;

/// One page's worth of presentation state.
///
/// Owns the rendering surface and every component that writes into it. The
/// layout is injected so the same page logic runs against a browser, a
/// terminal, or a test double.
pub struct Page {
    surface: Surface,
    controller: RequestController,
    renderer: ResultRenderer,
    annotator: InteractiveAnnotator,
    timeline: Timeline<AnnotatorTask>,
    layout: Box<dyn Layout + Send + Sync>,
    result: Option<SolveResult>,
}

impl Page {
    pub fn new(mode: SolveMode, layout: impl Layout + Send + Sync + 'static) -> Self {
        Self {
            surface: Surface::new(),
            controller: RequestController::new(mode),
            renderer: ResultRenderer::new(),
            annotator: InteractiveAnnotator::new(),
            timeline: Timeline::new(),
            layout: Box::new(layout),
            result: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn controller(&self) -> &RequestController {
        &self.controller
    }

    pub fn annotator(&self) -> &InteractiveAnnotator {
        &self.annotator
    }

    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    /// The result currently on display, if the last settled request succeeded.
    pub fn result(&self) -> Option<&SolveResult> {
        self.result.as_ref()
    }

    pub fn submit(&mut self, submission: &ClueSubmission) -> Result<Ticket, ValidationError> {
        let ticket = self.controller.begin(&mut self.surface, submission)?;
        self.result = None;
        Ok(ticket)
    }

    /// Applies a request's outcome. Returns `false` when the response was
    /// superseded by a newer submission and ignored.
    pub fn settle(&mut self, ticket: &Ticket, outcome: Result<SolveResult, SolveError>) -> bool {
        match self.controller.settle(&mut self.surface, ticket, outcome) {
            Settlement::Stale => false,
            Settlement::Applied(Ok(result)) => {
                self.renderer.render(
                    &result,
                    &mut self.surface,
                    &mut self.annotator,
                    &mut self.timeline,
                );
                self.result = Some(result);
                self.controller.finish();
                true
            }
            Settlement::Applied(Err(_)) => {
                self.controller.finish();
                true
            }
        }
    }

    /// Runs one full submission against `service`. A blocked submission
    /// issues no request.
    pub async fn solve<S: SolveService>(
        &mut self,
        service: &S,
        submission: &ClueSubmission,
    ) -> Result<(), ValidationError> {
        let ticket = self.submit(submission)?;
        let outcome = service.solve(&ticket).await;
        self.settle(&ticket, outcome);
        Ok(())
    }

    pub fn hover_enter(&mut self, position: usize) -> usize {
        self.annotator.hover_enter(
            &mut self.surface,
            self.layout.as_ref(),
            &mut self.timeline,
            position,
        )
    }

    pub fn hover_leave(&mut self) {
        self.annotator.hover_leave(&mut self.surface, &mut self.timeline);
    }

    /// Advances the page clock, running any transitions that fall due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        for task in self.timeline.advance(elapsed_ms) {
            self.annotator.run(&mut self.surface, task);
        }
    }

    /// Runs every pending transition to completion.
    pub fn settle_transitions(&mut self) {
        for task in self.timeline.drain() {
            self.annotator.run(&mut self.surface, task);
        }
    }

    pub fn toggle_reasoning(&mut self) -> bool {
        renderer::toggle_reasoning(&mut self.surface)
    }

    pub fn toggle_attempts(&mut self) -> bool {
        renderer::toggle_attempts(&mut self.surface)
    }
}
