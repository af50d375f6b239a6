//! Extension points around configuration assembly.

use bbforge_configurator::Configurator;

/// Fired on a fresh configurator, before any default is applied.
pub const CONFIGURE_BEFORE: &str = "core.text_formatter_configure_before";

/// Fired once every default, BBCode, smiley and censored word is loaded.
pub const CONFIGURE_AFTER: &str = "core.text_formatter_configure_after";

/// Lets extensions modify the configurator while it is assembled.
pub trait Dispatcher: Send + Sync {
    /// Run every listener of `event` on `configurator`.
    fn trigger(&self, event: &str, configurator: &mut Configurator);
}

/// [`Dispatcher`] without listeners.
pub struct NullDispatcher;

impl Dispatcher for NullDispatcher {
    fn trigger(&self, _event: &str, _configurator: &mut Configurator) {}
}

type Hook = Box<dyn Fn(&mut Configurator) + Send + Sync>;

/// [`Dispatcher`] running registered closures in registration order.
///
/// # Example
///
/// ```
/// use bbforge_configurator::Configurator;
/// use bbforge_factory::{CONFIGURE_AFTER, Dispatcher, HookDispatcher};
///
/// let dispatcher = HookDispatcher::new().on(CONFIGURE_AFTER, |configurator| {
///     configurator.registered_vars.insert("max_quote_depth".to_owned(), 3);
/// });
///
/// let mut configurator = Configurator::new();
/// dispatcher.trigger(CONFIGURE_AFTER, &mut configurator);
/// assert_eq!(configurator.registered_vars["max_quote_depth"], 3);
/// ```
#[derive(Default)]
pub struct HookDispatcher {
    hooks: Vec<(String, Hook)>,
}

impl HookDispatcher {
    /// Create a dispatcher without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to `event`.
    #[must_use]
    pub fn on(
        mut self,
        event: impl Into<String>,
        hook: impl Fn(&mut Configurator) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.push((event.into(), Box::new(hook)));
        self
    }
}

impl Dispatcher for HookDispatcher {
    fn trigger(&self, event: &str, configurator: &mut Configurator) {
        let mut fired = 0_usize;
        for (_, hook) in self.hooks.iter().filter(|(name, _)| name == event) {
            hook(configurator);
            fired += 1;
        }
        tracing::debug!(event = %event, listeners = fired, "Triggered event");
    }
}
