//! The rendering surface the presentation core writes into.
//!
//! A page exposes a fixed set of addressable regions. Hiding a region only
//! flips its flag; its content stays attached until it is replaced.
//! Tooltips live in a separate body-level layer.

use crate::geometry::Placement;
use crate::model::WordRoleEntry;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionId {
    Loading,
    Error,
    Results,
    Answer,
    Confidence,
    Definition,
    Components,
    AttemptsSection,
    AttemptsList,
    ReasoningSection,
    ReasoningToggle,
    Reasoning,
    InteractiveSection,
    InteractiveClue,
}

impl RegionId {
    pub const ALL: [RegionId; 14] = [
        RegionId::Loading,
        RegionId::Error,
        RegionId::Results,
        RegionId::Answer,
        RegionId::Confidence,
        RegionId::Definition,
        RegionId::Components,
        RegionId::AttemptsSection,
        RegionId::AttemptsList,
        RegionId::ReasoningSection,
        RegionId::ReasoningToggle,
        RegionId::Reasoning,
        RegionId::InteractiveSection,
        RegionId::InteractiveClue,
    ];

    /// Element id used for the region in rendered markup.
    pub fn dom_id(&self) -> &'static str {
        match self {
            RegionId::Loading => "loading",
            RegionId::Error => "error-display",
            RegionId::Results => "solution-display",
            RegionId::Answer => "main-answer",
            RegionId::Confidence => "confidence",
            RegionId::Definition => "definition",
            RegionId::Components => "wordplay-components",
            RegionId::AttemptsSection => "attempts-section",
            RegionId::AttemptsList => "attempts-list",
            RegionId::ReasoningSection => "reasoning-section",
            RegionId::ReasoningToggle => "reasoning-toggle",
            RegionId::Reasoning => "reasoning-content",
            RegionId::InteractiveSection => "interactive-clue-section",
            RegionId::InteractiveClue => "interactive-clue",
        }
    }

    fn initially_hidden(&self) -> bool {
        matches!(
            self,
            RegionId::Loading
                | RegionId::Error
                | RegionId::Results
                | RegionId::AttemptsSection
                | RegionId::ReasoningSection
                | RegionId::Reasoning
                | RegionId::InteractiveSection
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub hidden: bool,
    pub text: String,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Block,
    Inline,
    Heading,
    /// Bare text, rendered without a wrapping tag.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub classes: BTreeSet<String>,
    pub text: String,
    /// Token index for clue words.
    pub position: Option<usize>,
    pub style: BTreeMap<String, String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            classes: BTreeSet::new(),
            text: String::new(),
            position: None,
            style: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn block(class: &str) -> Self {
        Self::new(ElementKind::Block).with_class(class)
    }

    pub fn inline(class: &str) -> Self {
        Self::new(ElementKind::Inline).with_class(class)
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Heading).with_text(text)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text).with_text(text)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() {
            self.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        self.classes.remove(class)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }

    pub fn class_attr(&self) -> String {
        self.classes.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    pub fn find_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_class(class))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TooltipId(u64);

/// A tooltip as it exists at runtime: what it describes and where it hangs.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInstance {
    pub anchor_position: usize,
    pub placement: Placement,
    pub content: WordRoleEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipNode {
    pub id: TooltipId,
    /// Hover generation the tooltip was created for.
    pub generation: u64,
    pub instance: TooltipInstance,
    pub element: Element,
}

impl TooltipNode {
    pub fn is_shown(&self) -> bool {
        self.element.has_class("show")
    }
}

#[derive(Debug, Clone)]
pub struct Surface {
    regions: BTreeMap<RegionId, Region>,
    tooltips: Vec<TooltipNode>,
    next_tooltip: u64,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        let regions = RegionId::ALL
            .iter()
            .map(|id| {
                (
                    *id,
                    Region {
                        hidden: id.initially_hidden(),
                        ..Region::default()
                    },
                )
            })
            .collect();
        Self {
            regions,
            tooltips: Vec::new(),
            next_tooltip: 0,
        }
    }

    pub fn region(&self, id: RegionId) -> &Region {
        // Every RegionId is inserted by `new`.
        &self.regions[&id]
    }

    fn region_mut(&mut self, id: RegionId) -> &mut Region {
        self.regions.entry(id).or_default()
    }

    pub fn is_hidden(&self, id: RegionId) -> bool {
        self.region(id).hidden
    }

    pub fn is_visible(&self, id: RegionId) -> bool {
        !self.is_hidden(id)
    }

    pub fn set_hidden(&mut self, id: RegionId, hidden: bool) {
        self.region_mut(id).hidden = hidden;
    }

    pub fn hide(&mut self, id: RegionId) {
        self.set_hidden(id, true);
    }

    pub fn show(&mut self, id: RegionId) {
        self.set_hidden(id, false);
    }

    /// Flips the hidden flag and returns the new visibility.
    pub fn toggle(&mut self, id: RegionId) -> bool {
        let region = self.region_mut(id);
        region.hidden = !region.hidden;
        !region.hidden
    }

    pub fn text(&self, id: RegionId) -> &str {
        &self.region(id).text
    }

    pub fn set_text(&mut self, id: RegionId, text: impl Into<String>) {
        self.region_mut(id).text = text.into();
    }

    pub fn children(&self, id: RegionId) -> &[Element] {
        &self.region(id).children
    }

    pub fn clear_children(&mut self, id: RegionId) {
        self.region_mut(id).children.clear();
    }

    pub fn append(&mut self, id: RegionId, element: Element) {
        self.region_mut(id).children.push(element);
    }

    pub fn contains_class(&self, id: RegionId, class: &str) -> bool {
        self.children(id)
            .iter()
            .any(|child| child.find_class(class).is_some())
    }

    /// Rendered clue words, in token order.
    pub fn tokens(&self) -> impl Iterator<Item = &Element> {
        self.children(RegionId::InteractiveClue)
            .iter()
            .filter(|element| element.position.is_some())
    }

    pub fn token(&self, position: usize) -> Option<&Element> {
        self.tokens().find(|element| element.position == Some(position))
    }

    pub fn token_mut(&mut self, position: usize) -> Option<&mut Element> {
        self.region_mut(RegionId::InteractiveClue)
            .children
            .iter_mut()
            .find(|element| element.position == Some(position))
    }

    pub fn tokens_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.region_mut(RegionId::InteractiveClue)
            .children
            .iter_mut()
            .filter(|element| element.position.is_some())
    }

    pub fn insert_tooltip(
        &mut self,
        generation: u64,
        instance: TooltipInstance,
        element: Element,
    ) -> TooltipId {
        let id = TooltipId(self.next_tooltip);
        self.next_tooltip += 1;
        self.tooltips.push(TooltipNode {
            id,
            generation,
            instance,
            element,
        });
        id
    }

    pub fn tooltips(&self) -> &[TooltipNode] {
        &self.tooltips
    }

    pub fn tooltips_in(&self, generation: u64) -> impl Iterator<Item = &TooltipNode> {
        self.tooltips
            .iter()
            .filter(move |node| node.generation == generation)
    }

    pub fn tooltip(&self, id: TooltipId) -> Option<&TooltipNode> {
        self.tooltips.iter().find(|node| node.id == id)
    }

    pub fn tooltip_mut(&mut self, id: TooltipId) -> Option<&mut TooltipNode> {
        self.tooltips.iter_mut().find(|node| node.id == id)
    }

    pub fn tooltips_mut(&mut self) -> impl Iterator<Item = &mut TooltipNode> {
        self.tooltips.iter_mut()
    }

    /// Detaches a tooltip. Returns `false` when it was already gone.
    pub fn remove_tooltip(&mut self, id: TooltipId) -> bool {
        let before = self.tooltips.len();
        self.tooltips.retain(|node| node.id != id);
        self.tooltips.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn fresh_surface_hides_transient_regions() {
        let surface = Surface::new();
        assert!(surface.is_hidden(RegionId::Loading));
        assert!(surface.is_hidden(RegionId::Error));
        assert!(surface.is_hidden(RegionId::Results));
        assert!(surface.is_hidden(RegionId::InteractiveSection));
        assert!(surface.is_visible(RegionId::Answer));
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut surface = Surface::new();
        assert!(surface.toggle(RegionId::Reasoning));
        assert!(!surface.toggle(RegionId::Reasoning));
    }

    #[test]
    fn token_lookup_skips_spacing() {
        let mut surface = Surface::new();
        surface.append(
            RegionId::InteractiveClue,
            Element::inline("clue-word").with_text("Fast").with_position(0),
        );
        surface.append(RegionId::InteractiveClue, Element::text(" "));
        surface.append(
            RegionId::InteractiveClue,
            Element::inline("clue-word").with_text("runner").with_position(1),
        );
        assert_eq!(surface.tokens().count(), 2);
        assert_eq!(surface.token(1).unwrap().text, "runner");
        assert!(surface.token(2).is_none());
    }

    #[test]
    fn removing_detached_tooltip_is_noop() {
        let mut surface = Surface::new();
        let id = surface.insert_tooltip(
            1,
            TooltipInstance {
                anchor_position: 0,
                placement: Placement::Above,
                content: WordRoleEntry::new(Role::Definition, "def"),
            },
            Element::block("word-tooltip"),
        );
        assert!(surface.remove_tooltip(id));
        assert!(!surface.remove_tooltip(id));
        assert!(surface.tooltips().is_empty());
    }
}
