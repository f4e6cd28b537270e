//! Clip I/O, joint pairing, retargeting, and result serialization for mocap-retarget.

mod domain;
mod error;
mod pairing;
mod reader;
mod retarget;
mod writer;

pub use domain::{Clip, ExperimentName, JointName};
pub use error::IoError;
pub use pairing::{JointPair, pair_joints};
pub use reader::ClipReader;
pub use retarget::{JointReport, RetargetOutput, TimelineMode, retarget};
pub use writer::{ResultWriter, traceback_name};
