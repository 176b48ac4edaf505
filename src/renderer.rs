//! Projection of a [`SolveResult`] onto the result regions.

use crate::annotator::{AnnotatorTask, InteractiveAnnotator};
use crate::model::{AttemptedSolution, CompleteSolution, SolveResult, WordplayComponent};
use crate::surface::{Element, RegionId, Surface};
use crate::timeline::Timeline;

pub const UNKNOWN_ANSWER: &str = "Unknown";
pub const NOT_PROVIDED: &str = "Not provided";
pub const NO_COMPONENTS: &str = "No wordplay components identified";
pub const SHOW_REASONING: &str = "Show Reasoning";
pub const HIDE_REASONING: &str = "Hide Reasoning";

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRenderer;

impl ResultRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        result: &SolveResult,
        surface: &mut Surface,
        annotator: &mut InteractiveAnnotator,
        timeline: &mut Timeline<AnnotatorTask>,
    ) {
        let solution = &result.complete_solution;
        surface.set_text(RegionId::Answer, answer_text(solution));
        surface.set_text(RegionId::Confidence, confidence_text(result.confidence));
        surface.set_text(RegionId::Definition, definition_text(solution));

        surface.clear_children(RegionId::Components);
        if solution.wordplay_components.is_empty() {
            surface.append(
                RegionId::Components,
                Element::block("no-components").with_text(NO_COMPONENTS),
            );
        } else {
            for (index, component) in solution.wordplay_components.iter().enumerate() {
                surface.append(RegionId::Components, component_block(index + 1, component));
            }
        }

        surface.clear_children(RegionId::AttemptsList);
        if result.attempted_solutions.is_empty() {
            surface.hide(RegionId::AttemptsSection);
        } else {
            for (index, attempt) in result.attempted_solutions.iter().enumerate() {
                surface.append(RegionId::AttemptsList, attempt_block(index + 1, attempt));
            }
            surface.show(RegionId::AttemptsList);
            surface.show(RegionId::AttemptsSection);
        }

        match result.reasoning.as_deref().filter(|text| !text.trim().is_empty()) {
            Some(reasoning) => {
                surface.set_text(RegionId::Reasoning, reasoning);
                surface.hide(RegionId::Reasoning);
                surface.set_text(RegionId::ReasoningToggle, SHOW_REASONING);
                surface.show(RegionId::ReasoningSection);
            }
            None => {
                surface.set_text(RegionId::Reasoning, "");
                surface.hide(RegionId::ReasoningSection);
            }
        }

        match result
            .interactive_clue
            .as_ref()
            .filter(|clue| !clue.word_mapping.is_empty())
        {
            Some(clue) => {
                annotator.clear(surface, timeline);
                annotator.build(surface, clue);
                surface.show(RegionId::InteractiveSection);
            }
            None => {
                annotator.clear(surface, timeline);
                surface.hide(RegionId::InteractiveSection);
            }
        }

        surface.show(RegionId::Results);
    }
}

/// Flips the reasoning block and its control label. Returns whether the
/// reasoning is now visible.
pub fn toggle_reasoning(surface: &mut Surface) -> bool {
    if surface.is_hidden(RegionId::ReasoningSection) {
        return false;
    }
    let visible = surface.toggle(RegionId::Reasoning);
    let label = if visible { HIDE_REASONING } else { SHOW_REASONING };
    surface.set_text(RegionId::ReasoningToggle, label);
    visible
}

/// Collapses or expands the attempted-solutions list.
pub fn toggle_attempts(surface: &mut Surface) -> bool {
    surface.toggle(RegionId::AttemptsList)
}

pub fn answer_text(solution: &CompleteSolution) -> &str {
    solution.solution_text().unwrap_or(UNKNOWN_ANSWER)
}

pub fn definition_text(solution: &CompleteSolution) -> &str {
    solution.definition_text().unwrap_or(NOT_PROVIDED)
}

/// Whole-number percentage, rounding halves up. A missing confidence
/// renders as `0`.
pub fn confidence_text(confidence: Option<f64>) -> String {
    let percent = (confidence.unwrap_or(0.0) * 100.0).round() as i64;
    percent.to_string()
}

pub fn component_block(number: usize, component: &WordplayComponent) -> Element {
    let mut block = Element::block("wordplay-component")
        .with_child(Element::heading(format!("Component {number}")))
        .with_child(labelled("component-type", "Type", &component.wordplay_type))
        .with_child(labelled("component-indicator", "Indicator", &component.indicator));
    if let Some(target) = component.target_text() {
        block = block.with_child(labelled("component-target", "Target", target));
    }
    if let Some(result) = component.result_text() {
        block = block.with_child(labelled("component-result", "Result", result));
    }
    block
}

pub fn attempt_block(number: usize, attempt: &AttemptedSolution) -> Element {
    let mut block = Element::block("attempt-item").with_child(Element::heading(format!("Attempt {number}")));
    if let Some(solution) = attempt.solution_text() {
        block = block.with_child(labelled("attempt-solution", "Solution", solution));
    }
    if let Some(definition) = attempt.definition_text() {
        block = block.with_child(labelled("attempt-definition", "Definition", definition));
    }
    let chips = attempt
        .wordplay_components
        .iter()
        .fold(Element::block("attempt-components"), |chips, component| {
            chips.with_child(Element::inline("mini-component").with_text(chip_text(component)))
        });
    block.with_child(chips)
}

pub fn chip_text(component: &WordplayComponent) -> String {
    let mut text = format!("{} ({})", component.indicator, component.wordplay_type);
    match (component.target_text(), component.result_text()) {
        (Some(target), Some(result)) => text.push_str(&format!(" → {target}: {result}")),
        (None, Some(result)) => text.push_str(&format!(": {result}")),
        _ => {}
    }
    text
}

fn labelled(class: &str, label: &str, value: &str) -> Element {
    Element::block(class)
        .with_child(Element::inline("field-label").with_text(format!("{label}: ")))
        .with_child(Element::inline("field-value").with_text(value))
}
