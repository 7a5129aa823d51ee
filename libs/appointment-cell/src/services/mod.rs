pub mod binding;

pub use binding::SlotBindingService;
