mod guillotine;
mod rect;

pub use guillotine::GuillotinePacker;
pub use rect::Rect;
