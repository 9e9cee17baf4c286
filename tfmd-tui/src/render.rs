//! Document composition: banner, TOC, front matter and body, in that order

use anyhow::Result;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use tfmd_core::{
    build_toc, extract_headings, split_front_matter, Document, PagingDecision, RenderConfig,
};

use crate::highlight::Highlighter;
use crate::markdown::{render_markdown, RenderOptions};
use crate::pager::Pager;
use crate::panel::Panel;
use crate::theme::Theme;

pub const TOC_TITLE: &str = "Table of Contents";
pub const FRONT_MATTER_TITLE: &str = "front-matter";

/// Render `doc` into `pager`, then finish the pager.
///
/// On error the pager is dropped without `finish`; backends release their
/// resources on drop.
pub fn render_paged(doc: &Document, config: &RenderConfig, mut pager: Box<dyn Pager>) -> Result<()> {
    render_document(doc, config, pager.as_mut())?;
    pager.finish()
}

/// Emit every section of `doc` into `pager`.
pub fn render_document(doc: &Document, config: &RenderConfig, pager: &mut dyn Pager) -> Result<()> {
    let split = split_front_matter(&doc.text);
    let headings = extract_headings(split.body);
    log::debug!(
        "rendering {}: {} headings, front matter {}",
        doc.display_name(),
        headings.len(),
        if split.front_matter.is_some() { "present" } else { "absent" }
    );

    let theme = Theme::resolve(config.preset());
    let prefer_light = config.preset().is_some_and(|preset| preset.is_light());
    let highlighter = Highlighter::new(config.code_theme(), prefer_light);

    if matches!(config.paging, PagingDecision::Less(_)) {
        emit_panel(pager, controls_banner(), config.width)?;
    }

    if config.show_toc {
        let rows = build_toc(&headings)
            .iter()
            .map(|row| {
                Line::from(vec![
                    Span::styled(row.prefix(), theme.toc_item),
                    Span::styled(row.text().to_string(), theme.toc_item),
                ])
            })
            .collect();
        let panel = Panel::new(rows).title(Span::styled(TOC_TITLE, theme.toc_header));
        emit_panel(pager, panel, config.width)?;
    }

    if config.show_front_matter {
        if let Some(front_matter) = split.front_matter_trimmed() {
            let lines = highlighter.highlight(Some("yaml"), front_matter);
            let panel = Panel::new(lines)
                .title(Span::raw(FRONT_MATTER_TITLE))
                .wrap(config.soft_wrap);
            emit_panel(pager, panel, config.width)?;
        }
    }

    let options = RenderOptions {
        width: config.width,
        soft_wrap: config.soft_wrap,
        theme: &theme,
        highlighter: &highlighter,
    };
    pager.emit(&render_markdown(split.body, &options))
}

fn emit_panel(pager: &mut dyn Pager, panel: Panel, width: u16) -> Result<()> {
    pager.emit(&panel.render(width))?;
    pager.emit(&[Line::default()])
}

/// Key summary shown above the document when paging through `less`
fn controls_banner() -> Panel {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let keys = [
        ("q", " quit   "),
        ("/", " search   "),
        ("n/N", " next/prev   "),
        ("g/G", " top/bottom   "),
        ("h", " help   "),
        ("↑/↓/PgUp/PgDn", " scroll"),
    ];

    let mut spans = vec![Span::styled("Controls: ", bold)];
    for (key, label) in keys {
        spans.push(Span::styled(key, bold));
        spans.push(Span::raw(label));
    }
    Panel::new(vec![Line::from(spans)])
}
