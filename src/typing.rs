use crate::style::StyleSpec;

/// Style that the next inserted characters receive when there is no
/// selection. Holds nothing when typed text should just use the ambient
/// default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypingState {
    pending: Option<StyleSpec>,
}

impl TypingState {
    pub fn pending(&self) -> Option<&StyleSpec> {
        self.pending.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Stores `spec`, or clears the state when `spec` is the ambient default.
    pub fn arm(&mut self, spec: StyleSpec, ambient: &StyleSpec) {
        if &spec == ambient {
            self.pending = None;
        } else {
            self.pending = Some(spec);
        }
    }

    pub fn clear(&mut self) {
        if self.pending.take().is_some() {
            tracing::trace!("pending typing style cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;
    use crate::style::StyleFlag;

    #[test]
    fn arming_with_the_default_clears() {
        let ambient = FormatConfig::default().default_spec();
        let mut bold = ambient.clone();
        bold.set_flag(StyleFlag::Bold, true);

        let mut typing = TypingState::default();
        typing.arm(bold.clone(), &ambient);
        assert_eq!(typing.pending(), Some(&bold));

        typing.arm(ambient.clone(), &ambient);
        assert!(!typing.is_armed());
    }
}
