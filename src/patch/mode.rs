//! Merge modes for list-valued fields.

use super::error::PatchError;
use std::fmt;
use std::str::FromStr;

/// MergeMode selects how list fields that differ are written into a patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MergeMode {
    /// Keep the server's elements and add the missing local ones.
    Append,
    /// Overwrite the server's list with the local list.
    #[default]
    Replace,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::Append => "append",
            MergeMode::Replace => "replace",
        }
    }
}

impl FromStr for MergeMode {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(MergeMode::Append),
            "replace" => Ok(MergeMode::Replace),
            other => Err(PatchError::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("append".parse::<MergeMode>().unwrap(), MergeMode::Append);
        assert_eq!("replace".parse::<MergeMode>().unwrap(), MergeMode::Replace);
        assert_eq!(MergeMode::default(), MergeMode::Replace);
    }

    #[test]
    fn test_unknown_mode() {
        let err = "Append".parse::<MergeMode>().unwrap_err();
        assert_eq!(
            err,
            PatchError::InvalidMode {
                mode: "Append".to_string()
            }
        );
        assert_eq!(err.to_string(), "unrecognized patching mode 'Append'");
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [MergeMode::Append, MergeMode::Replace] {
            assert_eq!(mode.to_string().parse::<MergeMode>().unwrap(), mode);
        }
    }
}
