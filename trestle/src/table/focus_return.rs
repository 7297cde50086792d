use std::sync::{Arc, RwLock};

use crate::focus::FocusState;

/// Where focus goes back to once an overlay opened from a row closes.
///
/// A fresh handle is created every time a row renders and is given to that
/// row's click callback and to its actions cell only. The actions menu
/// writes its trigger element id into it; whoever opened a drawer or modal
/// calls [`restore`](FocusReturn::restore) when it closes.
#[derive(Debug, Clone, Default)]
pub struct FocusReturn {
    trigger: Arc<RwLock<Option<String>>>,
}

impl FocusReturn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_trigger(&self, id: impl Into<String>) {
        if let Ok(mut trigger) = self.trigger.write() {
            *trigger = Some(id.into());
        }
    }

    pub fn trigger(&self) -> Option<String> {
        self.trigger.read().ok().and_then(|trigger| trigger.clone())
    }

    pub fn clear(&self) {
        if let Ok(mut trigger) = self.trigger.write() {
            *trigger = None;
        }
    }

    /// Move focus to the recorded trigger. Returns false when no trigger
    /// was recorded or it already had focus.
    pub fn restore(&self, focus: &mut FocusState) -> bool {
        match self.trigger() {
            Some(id) => {
                log::debug!("[focus_return] restoring focus to {id}");
                focus.focus(&id)
            }
            None => false,
        }
    }

    /// Whether both handles refer to the same row render.
    pub fn same_handle(&self, other: &FocusReturn) -> bool {
        Arc::ptr_eq(&self.trigger, &other.trigger)
    }
}
