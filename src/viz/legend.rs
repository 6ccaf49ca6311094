//! Bottom legend band: one color box per dataset, rows centered, hidden entries struck through.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width};
use super::util::to_plotters_rgb;
use crate::color::Rgb;

const BOX_W: i32 = 12;
const BOX_TO_TEXT_GAP: i32 = 6;
/// Horizontal gap between items, and the band's top and bottom padding.
const ITEM_PADDING: i32 = 20;
const ROW_GAP: i32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: Rgb,
    pub hidden: bool,
}

fn text_cap(total_w: i32) -> u32 {
    ((total_w as f32) * 0.4).max(40.0) as u32
}

fn item_width(item: &LegendItem, font_px: u32, total_w: i32, with_text: bool) -> i32 {
    if !with_text {
        return BOX_W;
    }
    let label = truncate_to_width(&item.label, font_px, text_cap(total_w));
    BOX_W + BOX_TO_TEXT_GAP + estimate_text_width_px(&label, font_px) as i32
}

/// Greedy flow into rows of item indices.
pub fn layout_rows(items: &[LegendItem], total_w: i32, font_px: u32, with_text: bool) -> Vec<Vec<usize>> {
    let usable = (total_w - 2 * ITEM_PADDING).max(BOX_W);
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut cur: Vec<usize> = Vec::new();
    let mut x = 0;
    for (i, item) in items.iter().enumerate() {
        let w = item_width(item, font_px, total_w, with_text);
        let needed = if cur.is_empty() { w } else { x + ITEM_PADDING + w };
        if needed > usable && !cur.is_empty() {
            rows.push(std::mem::take(&mut cur));
            x = w;
        } else {
            x = needed;
        }
        cur.push(i);
    }
    if !cur.is_empty() {
        rows.push(cur);
    }
    rows
}

fn row_height(font_px: u32) -> i32 {
    (font_px as i32).max(BOX_W)
}

/// Height of the legend band in pixels; zero without items.
pub fn legend_height(items: &[LegendItem], total_w: i32, font_px: u32, with_text: bool) -> i32 {
    let rows = layout_rows(items, total_w, font_px, with_text).len() as i32;
    if rows == 0 {
        return 0;
    }
    ITEM_PADDING + rows * row_height(font_px) + (rows - 1) * ROW_GAP + ITEM_PADDING / 2
}

pub fn draw_legend<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[LegendItem],
    font_px: u32,
    with_text: bool,
) -> Result<()> {
    let (w_u32, _) = legend_area.dim_in_pixel();
    let w = w_u32 as i32;
    let line_h = row_height(font_px);
    let label_style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, font_px)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut y_top = ITEM_PADDING / 2;
    for row in layout_rows(items, w, font_px, with_text) {
        let row_w: i32 = row
            .iter()
            .map(|&i| item_width(&items[i], font_px, w, with_text))
            .sum::<i32>()
            + ITEM_PADDING * (row.len() as i32 - 1);
        let mut x = ((w - row_w) / 2).max(0);
        let center_y = y_top + line_h / 2;

        for &i in &row {
            let item = &items[i];
            let color = to_plotters_rgb(item.color);
            legend_area
                .draw(&Rectangle::new(
                    [(x, center_y - BOX_W / 2), (x + BOX_W, center_y + BOX_W / 2)],
                    color.filled(),
                ))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;

            if with_text {
                let label = truncate_to_width(&item.label, font_px, text_cap(w));
                let text_x = x + BOX_W + BOX_TO_TEXT_GAP;
                let text_w = estimate_text_width_px(&label, font_px) as i32;
                legend_area
                    .draw(&Text::new(label.as_str(), (text_x, center_y), label_style.clone()))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                if item.hidden {
                    legend_area
                        .draw(&PathElement::new(
                            vec![(text_x, center_y), (text_x + text_w, center_y)],
                            BLACK.stroke_width(1),
                        ))
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                }
            } else if item.hidden {
                legend_area
                    .draw(&PathElement::new(
                        vec![(x, center_y), (x + BOX_W, center_y)],
                        BLACK.stroke_width(1),
                    ))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }

            x += item_width(item, font_px, w, with_text) + ITEM_PADDING;
        }
        y_top += line_h + ROW_GAP;
    }
    Ok(())
}
