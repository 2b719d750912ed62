use std::collections::VecDeque;

use genpdf::error::Error;
use genpdf::render::Area;
use genpdf::style::Style;
use genpdf::{Context, Element, Mm, Position, RenderResult, Size};

/// A block of text set flush on both margins. Inner lines stretch their word
/// gaps to the full width; the last line keeps normal spacing.
pub struct JustifiedParagraph {
    words: VecDeque<String>,
}

impl JustifiedParagraph {
    pub fn new(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Element for JustifiedParagraph {
    fn render(
        &mut self,
        context: &Context,
        mut area: Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let fonts = &context.font_cache;
        let max_width = area.size().width;
        let line_height = style.line_height(fonts);
        let space = style.str_width(fonts, " ");

        let widths: Vec<Mm> = self.words.iter().map(|w| style.str_width(fonts, w)).collect();
        let lines = break_lines(&widths, space, max_width);

        let mut start = 0;
        for count in lines {
            let line = &widths[start..start + count];
            let last = start + count == widths.len();
            let gap = if last {
                space
            } else {
                justified_gap(line, space, max_width)
            };

            let mut x = Mm::from(0);
            for (word, width) in self.words.iter().zip(line) {
                if !area.print_str(fonts, Position::new(x, 0), style, word)? {
                    // out of vertical space; the line moves to the next page
                    result.has_more = true;
                    break;
                }
                x += *width + gap;
            }
            if result.has_more {
                break;
            }

            let used: Mm = line.iter().copied().sum();
            let drawn = if last {
                used + space * (count - 1) as f64
            } else {
                max_width
            };
            result.size = result.size.stack_vertical(Size::new(drawn, line_height));
            area.add_offset(Position::new(0, line_height));

            self.words.drain(..count);
            start += count;
        }

        Ok(result)
    }
}

/// Greedy line breaking: the number of words on each line. A word wider than
/// the line gets a line of its own.
fn break_lines(widths: &[Mm], space: Mm, max_width: Mm) -> Vec<usize> {
    let mut lines = Vec::new();
    let mut count = 0;
    let mut used = Mm::from(0);

    for &width in widths {
        if count > 0 && used + space + width > max_width {
            lines.push(count);
            count = 0;
            used = Mm::from(0);
        }
        used = if count == 0 { width } else { used + space + width };
        count += 1;
    }
    if count > 0 {
        lines.push(count);
    }
    lines
}

/// Gap between words that makes `line` span exactly `max_width`.
fn justified_gap(line: &[Mm], space: Mm, max_width: Mm) -> Mm {
    if line.len() < 2 {
        return space;
    }
    let used: Mm = line.iter().copied().sum();
    (max_width - used) / (line.len() - 1) as f64
}
