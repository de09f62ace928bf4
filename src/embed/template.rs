//! Marker substitution for text compiled into the binary.

use std::marker::PhantomData;

/// Values for one template, as `(marker, value)` pairs.
pub trait TemplateVars {
    fn pairs(&self) -> Vec<(&'static str, String)>;
}

/// Embedded text containing `__MARKER__` placeholders filled from `V`.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _vars: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _vars: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.pairs()
            .into_iter()
            .fold(self.content.to_string(), |text, (marker, value)| text.replace(marker, &value))
    }

    /// Markers from `V` missing in the content, i.e. left behind by the
    /// build-time minifier.
    #[cfg(test)]
    pub fn missing_markers(&self, vars: &V) -> Vec<&'static str> {
        vars.pairs()
            .into_iter()
            .map(|(marker, _)| marker)
            .filter(|marker| !self.content.contains(marker))
            .collect()
    }
}
