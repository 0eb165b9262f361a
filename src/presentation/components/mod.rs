mod canvas;
mod fillview;
mod footer;
mod layout;
mod palette;
mod properties;

pub use canvas::{
    CARD_HEIGHT, CanvasContext, adjust_scroll_offset, card_bounds, render_canvas,
};
pub use fillview::{FillContext, FillFieldView, render_fill};
pub use footer::{FooterContext, render_footer};
pub use layout::{BuilderPanes, FillerPanes, inner, split_builder, split_filler};
pub use palette::{PaletteRow, entry_rows, palette_rows, render_palette};
pub use properties::{PropRowView, PropertiesContext, render_properties};
