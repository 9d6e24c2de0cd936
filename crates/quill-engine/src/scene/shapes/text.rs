use std::rc::Rc;

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, SolidBrush};
use crate::scene::{DrawCmd, DrawList, ZIndex};
use crate::text::{DrawTextOptions, MeasuringMode, TextBlock, TextStyle};

/// Immediate text payload: shaped by the renderer every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub style: TextStyle,
    /// Layout box in logical pixels. Text wraps at its width.
    pub layout_rect: Rect,
    pub color: Color,
    pub options: DrawTextOptions,
    pub mode: MeasuringMode,
}

/// Pre-shaped paragraph payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlockCmd {
    pub block: Rc<TextBlock>,
    /// Top-left of the block in logical pixels.
    pub origin: Vec2,
    pub color: Color,
    pub options: DrawTextOptions,
}

impl DrawList {
    /// Records a text draw laid out inside `layout_rect`.
    ///
    /// With `options.clip` the command is scoped to `layout_rect` through the
    /// clip stack, so nothing is painted outside it.
    pub fn draw_text(
        &mut self,
        z: ZIndex,
        text: impl Into<String>,
        style: &TextStyle,
        layout_rect: Rect,
        brush: &SolidBrush,
        options: DrawTextOptions,
        mode: MeasuringMode,
    ) {
        let cmd = DrawCmd::Text(TextCmd {
            text: text.into(),
            style: style.clone(),
            layout_rect,
            color: brush.color(),
            options,
            mode,
        });

        if options.clip {
            self.push_clip(layout_rect);
            self.push(z, cmd);
            self.pop_clip();
        } else {
            self.push(z, cmd);
        }
    }

    /// Records a pre-shaped text block drawn at `origin`.
    pub fn draw_text_block(
        &mut self,
        z: ZIndex,
        block: &Rc<TextBlock>,
        origin: Vec2,
        brush: &SolidBrush,
        options: DrawTextOptions,
    ) {
        let cmd = DrawCmd::TextBlock(TextBlockCmd {
            block: Rc::clone(block),
            origin,
            color: brush.color(),
            options,
        });

        if options.clip {
            let bounds = Rect::from_origin_size(origin, block.layout_size());
            self.push_clip(bounds);
            self.push(z, cmd);
            self.pop_clip();
        } else {
            self.push(z, cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontId;

    fn style() -> TextStyle {
        TextStyle::new("Segoe UI", FontId(0), 24.0)
    }

    #[test]
    fn clipped_text_carries_its_layout_rect() {
        let mut list = DrawList::new();
        let rect = Rect::new(50.0, 50.0, 200.0, 200.0);
        let brush = SolidBrush::new(Color::BLACK);

        list.draw_text(ZIndex(0), "long text", &style(), rect, &brush, DrawTextOptions::CLIP, MeasuringMode::Natural);

        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].clip_rect, Some(rect));
    }

    #[test]
    fn unclipped_text_is_not_scissored() {
        let mut list = DrawList::new();
        let rect = Rect::new(50.0, 300.0, 200.0, 200.0);
        let brush = SolidBrush::new(Color::BLACK);

        list.draw_text(ZIndex(0), "long text", &style(), rect, &brush, DrawTextOptions::NONE, MeasuringMode::Natural);

        assert_eq!(list.items()[0].clip_rect, None);
    }

    #[test]
    fn clip_does_not_leak_into_following_commands() {
        let mut list = DrawList::new();
        let brush = SolidBrush::new(Color::WHITE);
        let rect = Rect::new(50.0, 50.0, 200.0, 200.0);

        list.draw_text(ZIndex(0), "a", &style(), rect, &brush, DrawTextOptions::CLIP, MeasuringMode::Natural);
        list.fill_rect(ZIndex(0), Rect::new(50.0, 300.0, 200.0, 200.0), &brush);

        assert_eq!(list.items()[1].clip_rect, None);
    }
}
