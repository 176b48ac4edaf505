//! HTML rendering of a [`Surface`].
//!
//! Every string that came from the solving service or the user goes through
//! the askama escaper. Reasoning is Markdown with raw HTML disabled.

use crate::controller::SolveMode;
use crate::surface::{Element, ElementKind, RegionId, Surface, TooltipNode};
use askama::Html as HtmlEscaper;
use askama::{MarkupDisplay, Template};
use markdown::{Options as MarkdownOptions, to_html_with_options};
use std::fmt::Write as _;

/// Form values echoed back into the page.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub clue: String,
    pub length: String,
}

struct RegionView {
    id: &'static str,
    hidden: bool,
    text: String,
    markup: String,
}

fn region(surface: &Surface, id: RegionId) -> RegionView {
    let state = surface.region(id);
    RegionView {
        id: id.dom_id(),
        hidden: state.hidden,
        text: state.text.clone(),
        markup: render_elements(&state.children),
    }
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Cryptic Lens</title>
    <style>
      .hidden { display: none; }
      .word-tooltip { position: absolute; width: 300px; opacity: 0; transition: opacity 0.2s; }
      .word-tooltip.show { opacity: 1; }
      .clue-word.highlighted { font-weight: bold; }
      .clue-word.related-highlighted { text-decoration: underline; }
    </style>
  </head>
  <body data-mode="{{ mode }}">
    <main class="container">
      <h1>Cryptic Lens</h1>
      <form id="clue-form" method="post" action="/solve">
        <label for="clue-input">Clue</label>
        <input id="clue-input" name="clue" type="text" value="{{ form.clue }}" />
        <label for="solution-length">Length</label>
        <input id="solution-length" name="length" type="text" value="{{ form.length }}" />
        <button type="submit">Solve</button>
      </form>

      <div id="{{ loading.id }}" class="loading{% if loading.hidden %} hidden{% endif %}">Solving...</div>
      <div id="{{ error.id }}" class="error{% if error.hidden %} hidden{% endif %}">{{ error.text }}</div>

      <section id="{{ results.id }}"{% if results.hidden %} class="hidden"{% endif %}>
        <h2 id="{{ answer.id }}">{{ answer.text }}</h2>
        <p>Confidence: <span id="{{ confidence.id }}">{{ confidence.text }}</span>%</p>
        <p>Definition: <span id="{{ definition.id }}">{{ definition.text }}</span></p>
        <div id="{{ components.id }}">{{ components.markup|safe }}</div>

        <section id="{{ interactive.id }}"{% if interactive.hidden %} class="hidden"{% endif %}>
          <h3>Clue Breakdown</h3>
          <div id="{{ clue.id }}" class="interactive-clue">{{ clue.markup|safe }}</div>
          {{ interactive.markup|safe }}
        </section>

        <section id="{{ attempts.id }}"{% if attempts.hidden %} class="hidden"{% endif %}>
          <h3>Attempted Solutions</h3>
          <div id="{{ attempts_list.id }}"{% if attempts_list.hidden %} class="hidden"{% endif %}>{{ attempts_list.markup|safe }}</div>
        </section>

        <section id="{{ reasoning_section.id }}"{% if reasoning_section.hidden %} class="hidden"{% endif %}>
          <button id="{{ reasoning_toggle.id }}" type="button">{{ reasoning_toggle.text }}</button>
          <div id="{{ reasoning.id }}"{% if reasoning.hidden %} class="hidden"{% endif %}>{{ reasoning_html|safe }}</div>
        </section>
      </section>
    </main>
    <div id="tooltip-layer">{{ tooltips|safe }}</div>
  </body>
</html>"#,
    ext = "html"
)]
struct PageTemplate<'a> {
    mode: SolveMode,
    form: &'a FormState,
    loading: RegionView,
    error: RegionView,
    results: RegionView,
    answer: RegionView,
    confidence: RegionView,
    definition: RegionView,
    components: RegionView,
    interactive: RegionView,
    clue: RegionView,
    attempts: RegionView,
    attempts_list: RegionView,
    reasoning_section: RegionView,
    reasoning_toggle: RegionView,
    reasoning: RegionView,
    reasoning_html: String,
    tooltips: String,
}

/// Renders the full page document for `surface`.
pub fn render_page(
    surface: &Surface,
    mode: SolveMode,
    form: &FormState,
) -> Result<String, askama::Error> {
    let reasoning = region(surface, RegionId::Reasoning);
    let template = PageTemplate {
        mode,
        form,
        loading: region(surface, RegionId::Loading),
        error: region(surface, RegionId::Error),
        results: region(surface, RegionId::Results),
        answer: region(surface, RegionId::Answer),
        confidence: region(surface, RegionId::Confidence),
        definition: region(surface, RegionId::Definition),
        components: region(surface, RegionId::Components),
        interactive: region(surface, RegionId::InteractiveSection),
        clue: region(surface, RegionId::InteractiveClue),
        attempts: region(surface, RegionId::AttemptsSection),
        attempts_list: region(surface, RegionId::AttemptsList),
        reasoning_section: region(surface, RegionId::ReasoningSection),
        reasoning_toggle: region(surface, RegionId::ReasoningToggle),
        reasoning_html: render_markdown(&reasoning.text),
        reasoning,
        tooltips: render_tooltips(surface.tooltips()),
    };
    template.render()
}

fn escape(text: &str) -> MarkupDisplay<HtmlEscaper, &str> {
    MarkupDisplay::new_unsafe(text, HtmlEscaper)
}

fn markdown_options() -> MarkdownOptions {
    let mut options = MarkdownOptions::gfm();
    options.compile.allow_dangerous_html = false;
    options.compile.allow_dangerous_protocol = false;
    options
}

/// Markdown to HTML. Raw HTML in the source comes out escaped.
pub fn render_markdown(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    to_html_with_options(trimmed, &markdown_options())
        .unwrap_or_else(|_| escape(trimmed).to_string())
}

pub fn render_elements(elements: &[Element]) -> String {
    let mut out = String::new();
    for element in elements {
        write_element(&mut out, element);
    }
    out
}

fn write_element(out: &mut String, element: &Element) {
    let tag = match element.kind {
        ElementKind::Text => {
            let _ = write!(out, "{}", escape(&element.text));
            return;
        }
        ElementKind::Block => "div",
        ElementKind::Inline => "span",
        ElementKind::Heading => "h4",
    };
    out.push('<');
    out.push_str(tag);
    write_attributes(out, element);
    out.push('>');
    let _ = write!(out, "{}", escape(&element.text));
    for child in &element.children {
        write_element(out, child);
    }
    let _ = write!(out, "</{tag}>");
}

fn write_attributes(out: &mut String, element: &Element) {
    if !element.classes.is_empty() {
        let _ = write!(out, r#" class="{}""#, escape(&element.class_attr()));
    }
    if let Some(position) = element.position {
        let _ = write!(out, r#" data-position="{position}""#);
    }
    if !element.style.is_empty() {
        let style = element
            .style
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        let _ = write!(out, r#" style="{}""#, escape(&style));
    }
}

fn render_tooltips(tooltips: &[TooltipNode]) -> String {
    let mut out = String::new();
    for node in tooltips {
        let _ = write!(
            out,
            r#"<div class="tooltip-slot" data-generation="{}" data-anchor="{}">"#,
            node.generation, node.instance.anchor_position
        );
        write_element(&mut out, &node.element);
        out.push_str("</div>");
    }
    out
}
