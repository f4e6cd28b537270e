//! Joint correspondence between a source and a target clip.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::{info, instrument, warn};

use crate::IoError;
use crate::domain::{Clip, JointName};

/// A source joint matched to a target joint, written `source:target`
/// (for example `lHand:Hand`).
///
/// Parsing splits on the first `:`, so source joint names cannot contain one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JointPair {
    source: JointName,
    target: JointName,
}

impl JointPair {
    /// Pair a source joint with a target joint.
    #[must_use]
    pub fn new(source: JointName, target: JointName) -> Self {
        Self { source, target }
    }

    /// Return the source-clip joint.
    #[must_use]
    pub fn source(&self) -> &JointName {
        &self.source
    }

    /// Return the target-clip joint.
    #[must_use]
    pub fn target(&self) -> &JointName {
        &self.target
    }
}

impl FromStr for JointPair {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IoError::InvalidJointPair { raw: s.to_string() };
        let (source, target) = s.split_once(':').ok_or_else(invalid)?;
        let source = JointName::new(source.trim()).map_err(|_| invalid())?;
        let target = JointName::new(target.trim()).map_err(|_| invalid())?;
        Ok(Self { source, target })
    }
}

impl fmt::Display for JointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

/// Resolve the joint pairs to align between two clips.
///
/// With explicit pairs, every pair is checked against both clips and returned
/// in the given order. Without, joints present in both clips under the same
/// name are paired in source-clip order; joints found in only one clip are
/// dropped with a warning.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::MissingJoint`] | An explicit pair names a joint absent from its clip |
/// | [`IoError::DuplicateJoint`] | A joint appears in more than one explicit pair on the same side |
/// | [`IoError::NoCommonJoints`] | No explicit pairs and no shared joint names |
#[instrument(skip_all, fields(n_source = source.n_joints(), n_target = target.n_joints(), n_explicit = explicit.len()))]
pub fn pair_joints(
    source: &Clip,
    target: &Clip,
    explicit: &[JointPair],
) -> Result<Vec<JointPair>, IoError> {
    if !explicit.is_empty() {
        let mut seen_source = HashSet::new();
        let mut seen_target = HashSet::new();
        for pair in explicit {
            if !source.contains(pair.source.as_str()) {
                return Err(IoError::MissingJoint {
                    clip: "source",
                    joint: pair.source.to_string(),
                });
            }
            if !target.contains(pair.target.as_str()) {
                return Err(IoError::MissingJoint {
                    clip: "target",
                    joint: pair.target.to_string(),
                });
            }
            if !seen_source.insert(&pair.source) {
                return Err(IoError::DuplicateJoint {
                    joint: pair.source.to_string(),
                });
            }
            if !seen_target.insert(&pair.target) {
                return Err(IoError::DuplicateJoint {
                    joint: pair.target.to_string(),
                });
            }
        }
        return Ok(explicit.to_vec());
    }

    let mut pairs = Vec::new();
    for joint in source.joints() {
        if target.contains(joint.as_str()) {
            pairs.push(JointPair::new(joint.clone(), joint.clone()));
        } else {
            warn!(joint = %joint, "source joint has no match in target clip, dropping");
        }
    }
    for joint in target.joints() {
        if !source.contains(joint.as_str()) {
            warn!(joint = %joint, "target joint has no match in source clip, dropping");
        }
    }

    if pairs.is_empty() {
        return Err(IoError::NoCommonJoints);
    }

    info!(n_pairs = pairs.len(), "joints paired by name");
    Ok(pairs)
}
