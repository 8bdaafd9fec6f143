pub(crate) mod mutate;
pub(crate) mod store;
pub(crate) mod view;

pub(crate) use mutate::PinMutation;
pub(crate) use store::NoteStore;
pub(crate) use view::{category_counts, view, CategoryFilter};
