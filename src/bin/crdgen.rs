//! # CRD Generator
//!
//! Prints the `PodMonitor` CustomResourceDefinition as YAML.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/podmonitor.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use kube::core::CustomResourceExt;
use pod_monitor_controller::crd::PodMonitor;

fn main() {
    let crd = PodMonitor::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            println!("# This file is auto-generated by crdgen");
            println!("# DO NOT EDIT THIS FILE MANUALLY");
            println!("# Change the types in src/crd/ and regenerate");
            println!("#");
            println!("---");
            print!("{yaml}");
        }
        Err(e) => {
            eprintln!("Failed to serialize CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
