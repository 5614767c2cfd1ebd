use super::question::OptionKey;

/// Options picked for the current question, oldest first.
///
/// Updates are pure: [`Selection::select`] returns a new selection and leaves `self`
/// untouched, so callers decide when to commit it to the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    keys: Vec<OptionKey>,
}

/// Outcome of one selection click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionUpdate {
    pub selection: Selection,
    /// Option pushed out because the selection was already at capacity.
    pub evicted: Option<OptionKey>,
    /// The click removed an already selected option.
    pub deselected: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: impl IntoIterator<Item = OptionKey>) -> Self {
        let mut selection = Self::new();
        for key in keys {
            if !selection.contains(&key) {
                selection.keys.push(key);
            }
        }
        selection
    }

    /// Apply a click on `option`.
    ///
    /// Single-select replaces the whole selection. Multi-select toggles `option` off when it
    /// is already selected; otherwise it is appended, evicting the oldest option first when
    /// `required_count` options are already selected.
    pub fn select(
        &self,
        option: OptionKey,
        is_multi_select: bool,
        required_count: usize,
    ) -> SelectionUpdate {
        if !is_multi_select {
            return SelectionUpdate {
                selection: Selection { keys: vec![option] },
                evicted: None,
                deselected: false,
            };
        }

        let mut keys = self.keys.clone();
        if let Some(position) = keys.iter().position(|key| *key == option) {
            keys.remove(position);
            return SelectionUpdate {
                selection: Selection { keys },
                evicted: None,
                deselected: true,
            };
        }

        let capacity = required_count.max(1);
        let mut evicted = None;
        while keys.len() >= capacity {
            evicted = Some(keys.remove(0));
        }
        keys.push(option);

        SelectionUpdate {
            selection: Selection { keys },
            evicted,
            deselected: false,
        }
    }

    /// Submit is enabled exactly when the selection holds `required_count` options.
    pub fn is_complete(&self, required_count: usize) -> bool {
        self.keys.len() == required_count.max(1)
    }

    pub fn contains(&self, key: &OptionKey) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> &[OptionKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
