//! Token-by-token rendering of the clue with role annotations and paired
//! hover tooltips.

use crate::geometry::{self, Placement};
use crate::layout::Layout;
use crate::model::{InteractiveClue, Role, WordMapping, WordRoleEntry, tokenize};
use crate::surface::{Element, RegionId, Surface, TooltipId, TooltipInstance};
use crate::timeline::{FADE_OUT_MS, SHOW_DELAY_MS, Timeline};
use tracing::{debug, trace};

const HIGHLIGHTED: &str = "highlighted";
const RELATED_HIGHLIGHTED: &str = "related-highlighted";
const LEGEND_CLASS: &str = "clue-legend";

/// Deferred work produced by hover interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotatorTask {
    Show { id: TooltipId, generation: u64 },
    Remove { id: TooltipId },
}

#[derive(Debug, Default)]
pub struct InteractiveAnnotator {
    mapping: WordMapping,
    generation: u64,
}

impl InteractiveAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapping(&self) -> &WordMapping {
        &self.mapping
    }

    /// Generation of the tooltip set that is currently allowed to be shown.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Renders `clue` into the interactive region and installs its mapping.
    pub fn build(&mut self, surface: &mut Surface, clue: &InteractiveClue) {
        self.mapping = clue.word_mapping.clone();
        surface.clear_children(RegionId::InteractiveClue);
        let tokens = tokenize(&clue.original_clue);
        let last = tokens.len().saturating_sub(1);
        for (index, word) in tokens.into_iter().enumerate() {
            let mut element = Element::inline("clue-word")
                .with_text(word)
                .with_position(index);
            if let Some(entry) = self.mapping.get(index) {
                element.add_class(&entry.role.css_class());
            }
            surface.append(RegionId::InteractiveClue, element);
            if index < last {
                surface.append(RegionId::InteractiveClue, Element::text(" "));
            }
        }
        ensure_legend(surface);
        debug!(
            tokens = surface.tokens().count(),
            annotated = self.mapping.len(),
            "Built interactive clue"
        );
    }

    /// Drops the installed mapping and any rendered tokens.
    pub fn clear(&mut self, surface: &mut Surface, timeline: &mut Timeline<AnnotatorTask>) {
        self.teardown(surface, timeline);
        self.mapping = WordMapping::new();
        surface.clear_children(RegionId::InteractiveClue);
    }

    pub fn is_interactive(&self, surface: &Surface, position: usize) -> bool {
        self.mapping.get(position).is_some() && surface.token(position).is_some()
    }

    /// Handles the pointer entering the token at `position`. Returns how many
    /// tooltips the new set contains.
    pub fn hover_enter(
        &mut self,
        surface: &mut Surface,
        layout: &dyn Layout,
        timeline: &mut Timeline<AnnotatorTask>,
        position: usize,
    ) -> usize {
        if !self.is_interactive(surface, position) {
            return 0;
        }
        let Some(entry) = self.mapping.get(position).cloned() else {
            return 0;
        };

        self.teardown(surface, timeline);
        let generation = self.generation;

        let mut instances = vec![TooltipInstance {
            anchor_position: position,
            placement: Placement::Above,
            content: entry.clone(),
        }];
        if let Some((related_position, related)) = self.mapping.counterpart(&entry) {
            if surface.token(related_position).is_some() {
                instances.push(TooltipInstance {
                    anchor_position: related_position,
                    placement: Placement::Below,
                    content: related.clone(),
                });
            }
        }

        let viewport = layout.viewport();
        let count = instances.len();
        for (index, instance) in instances.into_iter().enumerate() {
            let class = if index == 0 {
                "primary-tooltip"
            } else {
                "secondary-tooltip"
            };
            let element = tooltip_element(&instance.content, class);
            let anchor_position = instance.anchor_position;
            let placement = instance.placement;
            let id = surface.insert_tooltip(generation, instance, element);

            let anchor = layout.token_rect(surface, anchor_position).unwrap_or_default();
            let height = surface.tooltip(id).and_then(|node| layout.tooltip_height(node));
            let coords = geometry::position(anchor, height, viewport, placement);
            if let Some(node) = surface.tooltip_mut(id) {
                node.element.add_class(placement.css_class());
                node.element.set_style("left", format!("{}px", coords.left));
                node.element.set_style("top", format!("{}px", coords.top));
                if let Some(offset) = coords.arrow_offset {
                    node.element.set_style("--arrow-offset", format!("{offset}px"));
                }
            }
            timeline.schedule(SHOW_DELAY_MS, AnnotatorTask::Show { id, generation });
        }

        if let Some(token) = surface.token_mut(position) {
            token.add_class(HIGHLIGHTED);
        }
        for related in &entry.related_positions {
            if let Some(token) = surface.token_mut(*related) {
                token.add_class(RELATED_HIGHLIGHTED);
            }
        }

        debug!(position, generation, tooltips = count, role = %entry.role, "Activated tooltip set");
        count
    }

    /// Handles the pointer leaving an annotated token.
    pub fn hover_leave(&mut self, surface: &mut Surface, timeline: &mut Timeline<AnnotatorTask>) {
        self.teardown(surface, timeline);
    }

    /// Applies a task that fell due on the timeline.
    pub fn run(&self, surface: &mut Surface, task: AnnotatorTask) {
        match task {
            AnnotatorTask::Show { id, generation } => {
                if generation != self.generation {
                    trace!(?id, generation, "Skipping show for a retired tooltip set");
                    return;
                }
                if let Some(node) = surface.tooltip_mut(id) {
                    node.element.add_class("show");
                }
            }
            AnnotatorTask::Remove { id } => {
                if !surface.remove_tooltip(id) {
                    trace!(?id, "Tooltip already detached");
                }
            }
        }
    }

    /// Retires the current tooltip set: every tooltip starts fading and is
    /// queued for removal, and all highlight styling is cleared. Safe to call
    /// repeatedly.
    fn teardown(&mut self, surface: &mut Surface, timeline: &mut Timeline<AnnotatorTask>) {
        self.generation += 1;
        let mut fading = 0usize;
        for node in surface.tooltips_mut() {
            node.element.remove_class("show");
            timeline.schedule(FADE_OUT_MS, AnnotatorTask::Remove { id: node.id });
            fading += 1;
        }
        for token in surface.tokens_mut() {
            token.remove_class(HIGHLIGHTED);
            token.remove_class(RELATED_HIGHLIGHTED);
        }
        if fading > 0 {
            trace!(fading, "Tore down tooltip set");
        }
    }
}

fn tooltip_element(entry: &WordRoleEntry, variant: &str) -> Element {
    let mut element = Element::block("word-tooltip")
        .with_class(variant)
        .with_child(Element::block("tooltip-role").with_text(entry.role.label()));
    if let Some(kind) = entry.type_label() {
        element = element.with_child(Element::block("tooltip-type").with_text(kind));
    }
    element = element.with_child(Element::block("tooltip-description").with_text(&entry.description));
    if let Some(result) = entry.result_text() {
        element = element.with_child(Element::block("tooltip-result").with_text(result));
    }
    element
}

/// Appends the role legend unless one is already present.
fn ensure_legend(surface: &mut Surface) {
    if surface.contains_class(RegionId::InteractiveSection, LEGEND_CLASS) {
        return;
    }
    let legend = Role::LEGEND.iter().fold(Element::block(LEGEND_CLASS), |legend, role| {
        legend.with_child(
            Element::block("legend-item")
                .with_child(Element::block("legend-color").with_class(role.as_str()))
                .with_child(Element::inline("legend-label").with_text(role.label())),
        )
    });
    surface.append(RegionId::InteractiveSection, legend);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridLayout;

    fn entry(role: Role, description: &str, related: &[usize]) -> WordRoleEntry {
        let mut entry = WordRoleEntry::new(role, description);
        entry.related_positions = related.to_vec();
        entry
    }

    // "Initially irritated raised uproar about drink that's tasteless"
    fn clue() -> InteractiveClue {
        let mut mapping = WordMapping::new();
        mapping.insert(0, entry(Role::Indicator, "first letter", &[1]));
        mapping.insert(1, entry(Role::Target, "irritated -> I", &[0]));
        mapping.insert(2, entry(Role::Indicator, "reversal", &[3]));
        mapping.insert(3, entry(Role::Target, "uproar -> DIN", &[2]));
        mapping.insert(6, entry(Role::Indicator, "link", &[]));
        mapping.insert(7, entry(Role::Definition, "tasteless", &[6, 8]));
        mapping.insert(8, entry(Role::Target, "off the end", &[]));
        InteractiveClue {
            original_clue: "Initially irritated raised uproar about drink that's tasteless".into(),
            word_mapping: mapping,
        }
    }

    struct Fixture {
        surface: Surface,
        annotator: InteractiveAnnotator,
        timeline: Timeline<AnnotatorTask>,
        layout: GridLayout,
    }

    impl Fixture {
        fn new() -> Self {
            let mut surface = Surface::new();
            let mut annotator = InteractiveAnnotator::new();
            annotator.build(&mut surface, &clue());
            Self {
                surface,
                annotator,
                timeline: Timeline::new(),
                layout: GridLayout::default(),
            }
        }

        fn enter(&mut self, position: usize) -> usize {
            self.annotator
                .hover_enter(&mut self.surface, &self.layout, &mut self.timeline, position)
        }

        fn leave(&mut self) {
            self.annotator.hover_leave(&mut self.surface, &mut self.timeline);
        }

        fn advance(&mut self, ms: u64) {
            for task in self.timeline.advance(ms) {
                self.annotator.run(&mut self.surface, task);
            }
        }

        fn active(&self) -> Vec<(usize, Placement)> {
            self.surface
                .tooltips_in(self.annotator.generation())
                .map(|node| (node.instance.anchor_position, node.instance.placement))
                .collect()
        }

        fn highlighted(&self) -> usize {
            self.surface
                .tokens()
                .filter(|token| token.has_class(HIGHLIGHTED) || token.has_class(RELATED_HIGHLIGHTED))
                .count()
        }
    }

    #[test]
    fn build_tags_mapped_tokens_only() {
        let fixture = Fixture::new();
        let tokens: Vec<_> = fixture.surface.tokens().collect();
        assert_eq!(tokens.len(), 8);
        assert!(tokens[0].has_class("role-indicator"));
        assert!(tokens[7].has_class("role-definition"));
        assert_eq!(tokens[4].class_attr(), "clue-word");
        assert_eq!(tokens[6].text, "that's");
    }

    #[test]
    fn legend_is_added_once() {
        let mut fixture = Fixture::new();
        fixture.annotator.build(&mut fixture.surface, &clue());
        let legends = fixture
            .surface
            .children(RegionId::InteractiveSection)
            .iter()
            .filter(|child| child.has_class(LEGEND_CLASS))
            .count();
        assert_eq!(legends, 1);
        let legend = &fixture.surface.children(RegionId::InteractiveSection)[0];
        assert_eq!(legend.children.len(), 3);
        assert_eq!(legend.text_content(), "DefinitionIndicatorTarget");
    }

    #[test]
    fn indicator_with_target_gets_two_tooltips() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.enter(2), 2);
        assert_eq!(
            fixture.active(),
            vec![(2, Placement::Above), (3, Placement::Below)]
        );
        let primary = &fixture.surface.tooltips()[0];
        assert!(primary.element.has_class("primary-tooltip"));
        assert!(primary.element.has_class("tooltip-above"));
        let secondary = &fixture.surface.tooltips()[1];
        assert!(secondary.element.has_class("secondary-tooltip"));
        assert_eq!(secondary.instance.content.description, "uproar -> DIN");
    }

    #[test]
    fn same_role_relations_give_single_tooltip() {
        let mut fixture = Fixture::new();
        // Position 7 relates to 6 (indicator, differs) so pick something with none.
        assert_eq!(fixture.enter(6), 1);
        assert_eq!(fixture.active(), vec![(6, Placement::Above)]);
    }

    #[test]
    fn counterpart_without_rendered_token_is_skipped() {
        let mut fixture = Fixture::new();
        // 7 -> [6, 8]: 6 is an indicator, so it pairs with 6.
        assert_eq!(fixture.enter(7), 2);
        assert_eq!(fixture.active()[1], (6, Placement::Below));

        let mut only_missing = clue();
        only_missing.word_mapping.insert(7, entry(Role::Definition, "tasteless", &[8]));
        let mut surface = Surface::new();
        let mut annotator = InteractiveAnnotator::new();
        let mut timeline = Timeline::new();
        annotator.build(&mut surface, &only_missing);
        let count = annotator.hover_enter(&mut surface, &GridLayout::default(), &mut timeline, 7);
        assert_eq!(count, 1);
    }

    #[test]
    fn unmapped_token_produces_nothing() {
        let mut fixture = Fixture::new();
        assert_eq!(fixture.enter(4), 0);
        assert!(fixture.surface.tooltips().is_empty());
        assert_eq!(fixture.highlighted(), 0);
        assert!(fixture.timeline.is_idle());
    }

    #[test]
    fn show_state_arrives_on_next_tick() {
        let mut fixture = Fixture::new();
        fixture.enter(0);
        assert!(fixture.surface.tooltips().iter().all(|node| !node.is_shown()));
        fixture.advance(SHOW_DELAY_MS);
        assert!(fixture.surface.tooltips().iter().all(|node| node.is_shown()));
    }

    #[test]
    fn highlights_hovered_and_related_tokens() {
        let mut fixture = Fixture::new();
        fixture.enter(7);
        assert!(fixture.surface.token(7).unwrap().has_class(HIGHLIGHTED));
        assert!(fixture.surface.token(6).unwrap().has_class(RELATED_HIGHLIGHTED));
        assert_eq!(fixture.highlighted(), 2);
    }

    #[test]
    fn leave_clears_everything_after_fade() {
        let mut fixture = Fixture::new();
        fixture.enter(2);
        fixture.advance(SHOW_DELAY_MS);
        fixture.leave();
        assert_eq!(fixture.highlighted(), 0);
        assert!(fixture.surface.tooltips().iter().all(|node| !node.is_shown()));
        assert_eq!(fixture.surface.tooltips().len(), 2);
        fixture.advance(FADE_OUT_MS);
        assert!(fixture.surface.tooltips().is_empty());
    }

    #[test]
    fn rapid_hover_replaces_previous_set() {
        let mut fixture = Fixture::new();
        fixture.enter(0);
        fixture.enter(2);
        assert_eq!(
            fixture.active(),
            vec![(2, Placement::Above), (3, Placement::Below)]
        );
        // Old set's pending show must not revive it.
        fixture.advance(SHOW_DELAY_MS);
        let shown: Vec<_> = fixture
            .surface
            .tooltips()
            .iter()
            .filter(|node| node.is_shown())
            .map(|node| node.instance.anchor_position)
            .collect();
        assert_eq!(shown, vec![2, 3]);
        fixture.advance(FADE_OUT_MS);
        assert_eq!(fixture.surface.tooltips().len(), 2);
    }

    #[test]
    fn repeated_leave_is_idempotent() {
        let mut fixture = Fixture::new();
        fixture.enter(2);
        fixture.leave();
        fixture.leave();
        fixture.advance(FADE_OUT_MS);
        assert!(fixture.surface.tooltips().is_empty());
        assert!(fixture.timeline.is_idle());
    }

    #[test]
    fn tooltip_content_follows_entry() {
        let mut target = entry(Role::Target, "DIN reversed", &[]);
        target.wordplay_type = Some("synonym".into());
        target.result = Some("NID".into());
        let element = tooltip_element(&target, "primary-tooltip");
        let classes: Vec<_> = element.children.iter().map(Element::class_attr).collect();
        assert_eq!(
            classes,
            vec!["tooltip-role", "tooltip-type", "tooltip-description", "tooltip-result"]
        );
        assert_eq!(element.children[0].text, "Target");

        let bare = tooltip_element(&entry(Role::Definition, "tasteless", &[]), "primary-tooltip");
        assert_eq!(bare.children.len(), 2);
    }

    #[test]
    fn tooltips_are_clamped_inside_viewport() {
        let mut fixture = Fixture::new();
        fixture.layout = GridLayout::default().with_origin(0.0, 5.0);
        fixture.enter(0);
        let node = &fixture.surface.tooltips()[0];
        assert_eq!(node.element.style.get("left").map(String::as_str), Some("10px"));
        assert_eq!(node.element.style.get("top").map(String::as_str), Some("10px"));
    }
}
