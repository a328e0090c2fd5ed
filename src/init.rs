use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::hook::KinesisHook;
use crate::layer::HookLayer;

/// Subscriber installation options.
///
/// **Fields**
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   stacked on top of [`HookLayer`] so events are also echoed to the
///   console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            enable_stdout: true,
        }
    }
}

/// Install the global `tracing` subscriber with the provided hook and
/// [`LayerConfig`].
///
/// **Parameters**
/// - `hook`: built [`KinesisHook`] that receives matching events.
/// - `config`: [`LayerConfig`] controlling the console echo.
///
/// **Effects**
///
/// Installs a [`Registry`] combined with [`HookLayer`] as the global
/// default subscriber, so all `tracing` events in the process are observed
/// by the layer.
pub fn init_tracing_with_config(hook: Arc<KinesisHook>, config: LayerConfig) {
    let layer = HookLayer::new(hook);

    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    }
}

/// Install the global `tracing` subscriber with default options.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`LayerConfig::default`].
pub fn init_tracing(hook: Arc<KinesisHook>) {
    init_tracing_with_config(hook, LayerConfig::default());
}
