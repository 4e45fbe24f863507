//! The scrollable page hosting the card stack.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::cards::Card;
use crate::app::host::{PageViewport, SECTION_ROWS};

use super::cards::{CardStackWidget, CardSurfaces};
use super::layout::StackSlot;
use super::theme::Theme;

const INTRO: &[&str] = &[
    "Scroll down to reach the card stack.",
    "",
    "When the stack is centred in the window it takes over the wheel,",
    "and the page stays put until you leave the stack at either end.",
];

const OUTRO: &[&str] = &[
    "Past the stack the page scrolls normally again.",
    "",
    "Scroll back up to the stack to capture it once more.",
];

fn section(heading: &str, text: &[&str]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(format!("  {heading}"), Theme::page_heading_style())),
        Line::raw(""),
    ];
    lines.extend(
        text.iter()
            .map(|t| Line::from(Span::styled(format!("  {t}"), Theme::page_text_style()))),
    );
    while lines.len() < usize::from(SECTION_ROWS) {
        lines.push(Line::from(Span::styled("  ·", Theme::page_filler_style())));
    }
    lines.truncate(usize::from(SECTION_ROWS));
    lines
}

/// Full page: intro, stack slot, outro.
pub struct PageWidget<'a> {
    pub page: &'a PageViewport,
    pub cards: &'a [Card],
    pub surfaces: &'a CardSurfaces,
    pub active: bool,
}

impl Widget for PageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = section("Card stack", INTRO);
        lines.extend((0..self.page.stack_rows()).map(|_| Line::raw("")));
        lines.extend(section("Below the stack", OUTRO));

        Paragraph::new(lines)
            .scroll((self.page.scroll_top(), 0))
            .render(area, buf);

        let slot = StackSlot::within(area, self.page);
        if slot.visible_part(area).is_none() {
            return;
        }
        CardStackWidget {
            cards: self.cards,
            surfaces: self.surfaces,
            origin: (slot.x, slot.y),
            width: slot.width,
            height: slot.height,
            active: self.active,
        }
        .render(area, buf);
    }
}
