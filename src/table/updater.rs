//! Update-or-function parameter for state setters.

/// Either a new value or a function from the previous value to the new one.
///
/// Plain values convert via `From`, so setters accept both
/// `controller.on_sorting_change(vec![])` and
/// `controller.on_sorting_change(Updater::with(|prev| ...))`.
pub enum Updater<T> {
    Set(T),
    Apply(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Updater<T> {
    /// Wraps a function of the previous value.
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Updater::Apply(Box::new(f))
    }

    /// Resolves the update against the previous value.
    pub fn resolve(self, prev: &T) -> T {
        match self {
            Updater::Set(value) => value,
            Updater::Apply(f) => f(prev),
        }
    }
}

impl<T> From<T> for Updater<T> {
    fn from(value: T) -> Self {
        Updater::Set(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Updater::Set(value) => f.debug_tuple("Set").field(value).finish(),
            Updater::Apply(_) => f.write_str("Apply(..)"),
        }
    }
}
