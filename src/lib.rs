//! # Image context maker
//!
//! This crate provides a workflow step that turns an ordered sequence of
//! image files into an image context: a scene-graph region that a
//! downstream viewer can render and play back.
//!
//! The region holds a unit square with a `coordinates` field, a `scale`
//! field sized to the images in pixels, a `duration` field equal to
//! `frame count / frames per second` and a `scaled_coordinates` field
//! mapping the square onto pixel space. Every image becomes one frame of an
//! image field, which textures a material named `images`.
//! Images are assumed to share the size of the first one, which is the only
//! file probed for its dimensions. Supported formats:
//!  - PNG, JPEG, TIFF, BMP, GIF (decoded to 16-bit luminance)
//!  - DICOM (first frame of each file)
//!
//!  A workflow host drives the step through [`WorkflowStep`]: it assigns an
//!  identifier, configures the step through a [`DialogDriver`], wires an
//!  [`ImageSequence`] into the `images` port, executes it and passes the
//!  resulting [`ImageContextData`] on. Steps are instantiated from a
//!  [`StepRegistry`].
//!
//! # Examples
//!
//! ## Building a context directly
//!
//! Read every image in the frames/ directory in natural order (`img2`
//! before `img10`) and build a context played at 25 frames per second.
//!
//! ```no_run
//! # use image_context_maker::{FrameOrder, ImageSequence, build_image_context};
//! let images = ImageSequence::from_directory("frames", FrameOrder::Natural)
//!     .expect("should have listed the frames directory");
//! let data = build_image_context(images.image_files(), 25.0)
//!     .expect("should have built the image context");
//! let [width, height] = data.image_dimensions();
//! println!("{} frames of {width}x{height}", data.frame_count());
//! ```
//!
//! ## Driving the step like a host
//!
//! ```no_run
//! # use image_context_maker::*;
//! struct Host;
//!
//! impl StepHost for Host {
//!     fn identifier_occurs_count(&self, _identifier: &str) -> usize { 1 }
//!     fn execution_done(&mut self, identifier: &str) { println!("{identifier} done") }
//!     fn configured_changed(&mut self, _identifier: &str, _configured: bool) {}
//! }
//!
//! let registry = StepRegistry::with_builtin_steps();
//! let mut step = registry
//!     .create(STEP_NAME, std::path::Path::new("workflow"))
//!     .expect("step should be registered");
//! step.deserialize(r#"{"identifier": "frames", "frames_per_second": 25}"#, &Host)
//!     .expect("configuration should parse");
//! let images = ImageSequence::from_directory("frames", FrameOrder::Natural)
//!     .expect("should have listed the frames directory");
//! step.set_port_data(IMAGES_PORT, PortData::Images(images))
//!     .expect("images port should accept images");
//! step.execute(&mut Host).expect("should have built the image context");
//! ```

pub mod config;
pub mod dialog;
pub mod enums;
pub mod image_context;
mod interpolator;
pub mod model;
pub mod natural_sort;
pub mod registry;
pub mod scene;
pub mod step;
pub mod volume;
pub mod volume_loader;

pub use config::{ConfigError, ConfigPatch, StepConfig};
pub use dialog::{ConfigureDialog, DialogDriver};
pub use enums::{FrameOrder, IdentifierStatus, ImageFormat, PortPredicate};
pub use image_context::{ImageContextData, ImageSequence};
pub use model::{LoadedImages, ModelError, build_image_context, create_model, load_images};
pub use natural_sort::{Chunk, alphanum_key, natural_cmp, sort_naturally};
pub use registry::{RegistryError, StepFactory, StepRegistry};
pub use step::{
    IMAGE_CONTEXT_DATA_PORT, IMAGES_PORT, ImageContextDataMakerStep, Port, PortData, STEP_NAME,
    StepError, StepHost, StepState, WorkflowStep,
};
pub use volume::ImageVolume;
pub use volume_loader::{ImageVolumeLoader, VolumeLoaderError};
