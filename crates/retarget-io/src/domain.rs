//! Domain types for retarget-io.

use std::collections::HashSet;

use retarget_dtw::Sequence;

use crate::IoError;

/// A skeleton joint (bone) name such as `lHand` or `Hips`.
///
/// Wraps a non-blank string. Names are compared exactly; no case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointName(String);

impl JointName {
    /// Create a joint name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidJointName`] if the name is empty or only whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, IoError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(IoError::InvalidJointName { name });
        }
        Ok(Self(name))
    }

    /// Return the joint name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One motion clip: a set of per-joint frame sequences.
///
/// Joints and channels are stored in parallel vectors, `joints[i]` owning
/// `channels[i]`, in first-appearance order. Every channel has one component
/// per entry of `components` (for example `rx,ry,rz`). Channels of different
/// joints may have different frame counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    components: Vec<String>,
    joints: Vec<JointName>,
    channels: Vec<Sequence>,
}

impl Clip {
    /// Assemble a clip from component names and `(joint, channel)` pairs.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::DuplicateJoint`] | The same joint name appears twice |
    /// | [`IoError::ChannelDimension`] | A channel's frame width differs from `components.len()` |
    pub fn new(
        components: Vec<String>,
        channels: Vec<(JointName, Sequence)>,
    ) -> Result<Self, IoError> {
        let mut seen = HashSet::with_capacity(channels.len());
        let mut joints = Vec::with_capacity(channels.len());
        let mut sequences = Vec::with_capacity(channels.len());

        for (joint, channel) in channels {
            if !seen.insert(joint.clone()) {
                return Err(IoError::DuplicateJoint {
                    joint: joint.to_string(),
                });
            }
            if channel.dim() != components.len() {
                return Err(IoError::ChannelDimension {
                    joint: joint.to_string(),
                    expected: components.len(),
                    got: channel.dim(),
                });
            }
            joints.push(joint);
            sequences.push(channel);
        }

        Ok(Self {
            components,
            joints,
            channels: sequences,
        })
    }

    /// Return the component column names.
    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Return the joint names in clip order.
    #[must_use]
    pub fn joints(&self) -> &[JointName] {
        &self.joints
    }

    /// Return the channels in clip order.
    #[must_use]
    pub fn channels(&self) -> &[Sequence] {
        &self.channels
    }

    /// Look up the channel of a joint by name.
    #[must_use]
    pub fn channel(&self, joint: &str) -> Option<&Sequence> {
        self.joints
            .iter()
            .position(|j| j.as_str() == joint)
            .map(|i| &self.channels[i])
    }

    /// Return `true` if the clip has a channel for `joint`.
    #[must_use]
    pub fn contains(&self, joint: &str) -> bool {
        self.channel(joint).is_some()
    }

    /// Iterate over `(joint, channel)` pairs in clip order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&JointName, &Sequence)> + '_ {
        self.joints.iter().zip(&self.channels)
    }

    /// Return the number of joints.
    #[must_use]
    pub fn n_joints(&self) -> usize {
        self.joints.len()
    }

    /// Return the frame count shared by every channel, or `None` if the
    /// clip is empty or its channels disagree.
    #[must_use]
    pub fn uniform_frame_count(&self) -> Option<usize> {
        let first = self.channels.first()?.len();
        self.channels
            .iter()
            .all(|c| c.len() == first)
            .then_some(first)
    }
}
