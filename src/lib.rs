//! Presentation core for an interactive cryptic-crossword solving page.
//!
//! A [`Page`] owns the rendering [`Surface`] and drives it through clue
//! submission, result rendering and hover annotation. Deferred UI work runs
//! on a virtual [`Timeline`], so the whole page is deterministic to test.

pub mod annotator;
pub mod client;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod html;
pub mod layout;
pub mod mock;
pub mod model;
pub mod page;
pub mod renderer;
pub mod surface;
pub mod timeline;
#[cfg(feature = "web")]
pub mod web;

pub use client::{ClientConfig, HttpSolveClient, SolveService, SolverBackend};
pub use controller::{ClueSubmission, RequestController, RequestState, SolveMode};
pub use error::{SolveError, ValidationError};
pub use layout::{GridLayout, Layout};
pub use model::{Role, SolveResult, WordMapping, WordRoleEntry};
pub use page::Page;
pub use surface::{RegionId, Surface};
pub use timeline::Timeline;
