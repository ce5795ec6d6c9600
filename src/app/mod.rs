// Application layer - Use case interactors

pub mod clip_interactor;
pub mod container;
pub mod convert_interactor;
pub mod frames_interactor;
pub mod grab_interactor;

// Re-export interactors
pub use clip_interactor::{ClipInteractor, ClipsRequest, ClipsResponse};
pub use container::{AppContainer, DefaultAppContainer};
pub use convert_interactor::{ConvertInteractor, ConvertRequest, ConvertResponse};
pub use frames_interactor::FramesInteractor;
pub use grab_interactor::GrabInteractor;
