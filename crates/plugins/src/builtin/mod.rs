//! Built-in plugins
//!
//! Generated code reads outputs through `get_<output>()` and writes inputs
//! through `set_<input>(value)` on the module object.

mod csv;
mod pubsub;

pub use self::csv::{CsvPlugin, CSV_PLUGIN};
pub use self::pubsub::{PubSubPlugin, PUBSUB_PLUGIN, ROSSERIAL_LIBRARY};

use contracts::{Port, ResolvedModule};

fn getter(module: &ResolvedModule, port: &Port) -> String {
    format!("{}.get_{}()", module.id, port.name)
}

fn setter(module: &ResolvedModule, port: &Port, value: &str) -> String {
    format!("{}.set_{}({value});", module.id, port.name)
}

/// Identifier-safe `<module>_<port>` stem for generated globals
fn symbol(module: &ResolvedModule, port: &Port) -> String {
    format!("{}_{}", module.id, port.name)
}
