//! `pubsub` - rosserial publish/subscribe bindings
//!
//! Each output is published on `<module>/<output>` once per status cycle;
//! each input is fed from a subscriber on `<module>/<input>`.

use std::collections::HashSet;

use contracts::{ContractError, DataType, Fragment, Plugin, Port, ResolvedModule, Scope};
use tracing::{debug, instrument};

use super::{getter, setter, symbol};

pub const PUBSUB_PLUGIN: &str = "pubsub";
pub const ROSSERIAL_LIBRARY: &str = "frankjoshua/Rosserial Arduino Library";

/// rosserial publisher/subscriber generator
#[derive(Debug, Clone, Copy, Default)]
pub struct PubSubPlugin;

fn message_type(data_type: DataType) -> (&'static str, &'static str) {
    match data_type {
        DataType::Bool => ("std_msgs::Bool", "<std_msgs/Bool.h>"),
        DataType::Int => ("std_msgs::Int32", "<std_msgs/Int32.h>"),
        DataType::Float => ("std_msgs::Float32", "<std_msgs/Float32.h>"),
        DataType::String => ("std_msgs::String", "<std_msgs/String.h>"),
    }
}

fn topic(module: &ResolvedModule, port: &Port) -> String {
    format!("{}/{}", module.id, port.name)
}

impl Plugin for PubSubPlugin {
    fn name(&self) -> &str {
        PUBSUB_PLUGIN
    }

    fn description(&self) -> &str {
        "rosserial publishers for outputs and subscribers for inputs"
    }

    fn uses_serial(&self) -> bool {
        true
    }

    #[instrument(name = "pubsub_render", skip_all, fields(modules = modules.len()))]
    fn render(&self, modules: &[ResolvedModule]) -> Result<Fragment, ContractError> {
        let mut fragment = Fragment::new(PUBSUB_PLUGIN);
        fragment.include("<ros.h>").depend_on(ROSSERIAL_LIBRARY);

        let mut globals = String::from("ros::NodeHandle nh;\n");
        let mut setup = String::from("nh.initNode();\n");
        let mut update = String::new();
        let mut symbols = HashSet::new();

        for module in modules {
            for port in module.inputs.iter().chain(&module.outputs) {
                let sym = symbol(module, port);
                if !symbols.insert(sym.clone()) {
                    return Err(ContractError::plugin(
                        PUBSUB_PLUGIN,
                        format!("generated name '{sym}' is used by more than one port"),
                    ));
                }
            }

            for output in &module.outputs {
                let (msg_type, header) = message_type(output.data_type);
                let sym = symbol(module, output);
                fragment.include(header);

                globals.push_str(&format!(
                    "\n{msg_type} {sym}_msg;\nros::Publisher {sym}_pub(\"{}\", &{sym}_msg);\n",
                    topic(module, output)
                ));
                setup.push_str(&format!("nh.advertise({sym}_pub);\n"));
                update.push_str(&format!(
                    "{sym}_msg.data = {};\n{sym}_pub.publish(&{sym}_msg);\n",
                    getter(module, output)
                ));
            }

            for input in &module.inputs {
                let (msg_type, header) = message_type(input.data_type);
                let sym = symbol(module, input);
                fragment.include(header);

                globals.push_str(&format!(
                    "\nvoid {sym}_callback(const {msg_type}& msg) {{\n  {}\n}}\n\
                     ros::Subscriber<{msg_type}> {sym}_sub(\"{}\", &{sym}_callback);\n",
                    setter(module, input, "msg.data"),
                    topic(module, input)
                ));
                setup.push_str(&format!("nh.subscribe({sym}_sub);\n"));
            }
        }

        debug!(topics = symbols.len(), "pubsub bindings rendered");

        fragment
            .push(Scope::Global, globals)
            .push(Scope::Setup, setup)
            .push(Scope::Loop, "nh.spinOnce();\n")
            .push(Scope::Update, update);
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Category;
    use std::collections::BTreeMap;

    fn port(name: &str, data_type: DataType) -> Port {
        Port {
            name: name.into(),
            data_type,
            category: Category::new(Category::ENVIRONMENTAL),
        }
    }

    fn module(id: &str, inputs: Vec<Port>, outputs: Vec<Port>) -> ResolvedModule {
        ResolvedModule {
            id: id.into(),
            type_id: "temp_sensor".into(),
            class_name: "TempSensor".into(),
            header_files: vec![],
            arguments: vec![],
            parameters: BTreeMap::new(),
            inputs,
            outputs,
            commands: vec![],
            dependencies: vec![],
        }
    }

    fn code(fragment: &Fragment, scope: Scope) -> String {
        fragment
            .blocks_in(scope)
            .map(|b| b.code.as_str())
            .collect()
    }

    #[test]
    fn test_publisher_per_output_subscriber_per_input() {
        let modules = vec![module(
            "t1",
            vec![port("heater", DataType::Bool)],
            vec![port("temperature", DataType::Float)],
        )];
        let fragment = PubSubPlugin.render(&modules).unwrap();

        assert_eq!(
            fragment.includes,
            vec!["<ros.h>", "<std_msgs/Float32.h>", "<std_msgs/Bool.h>"]
        );
        assert_eq!(fragment.dependencies, vec![ROSSERIAL_LIBRARY]);

        let globals = code(&fragment, Scope::Global);
        assert!(globals.contains("ros::Publisher t1_temperature_pub(\"t1/temperature\""));
        assert!(globals.contains("ros::Subscriber<std_msgs::Bool> t1_heater_sub(\"t1/heater\""));
        assert!(globals.contains("t1.set_heater(msg.data);"));

        let setup = code(&fragment, Scope::Setup);
        assert!(setup.starts_with("nh.initNode();"));
        assert!(setup.contains("nh.advertise(t1_temperature_pub);"));
        assert!(setup.contains("nh.subscribe(t1_heater_sub);"));

        assert_eq!(code(&fragment, Scope::Loop), "nh.spinOnce();\n");
        assert!(code(&fragment, Scope::Update).contains("t1_temperature_msg.data = t1.get_temperature();"));
    }

    #[test]
    fn test_pruned_modules_produce_no_topics() {
        let fragment = PubSubPlugin.render(&[module("t1", vec![], vec![])]).unwrap();
        assert!(!code(&fragment, Scope::Global).contains("Publisher"));
        assert_eq!(fragment.blocks_in(Scope::Update).count(), 0);
        // still links rosserial: the node handle is always emitted
        assert_eq!(fragment.dependencies, vec![ROSSERIAL_LIBRARY]);
    }

    #[test]
    fn test_colliding_generated_names() {
        let modules = vec![
            module("a_b", vec![], vec![port("c", DataType::Int)]),
            module("a", vec![], vec![port("b_c", DataType::Int)]),
        ];
        match PubSubPlugin.render(&modules) {
            Err(ContractError::Plugin { plugin, message }) => {
                assert_eq!(plugin, PUBSUB_PLUGIN);
                assert!(message.contains("a_b_c"));
            }
            other => panic!("expected Plugin error, got {other:?}"),
        }
    }
}
