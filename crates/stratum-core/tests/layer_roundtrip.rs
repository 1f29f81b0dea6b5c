//! Integration tests tying mount-option construction to mount-table parsing.
//!
//! The kernel echoes the option string back in the mount table, so parsing
//! a line built from the options must restore the caller's layer stack.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use stratum_common::types::{LayerStack, MountRequest};
use stratum_core::mountinfo::lookup::select_line;
use stratum_core::mountinfo::parse_mount_line;
use stratum_core::options::MountOptions;

fn mount_line(target: &str, options: &MountOptions) -> String {
    format!("overlay on {target} type overlay (rw,relatime,{options})")
}

#[test]
fn parsing_restores_layers_built_into_options() {
    let stacks: [&[&str]; 4] = [
        &["/l/base"],
        &["base", "app"],
        &["/var/lib/stratum/layers/a", "/var/lib/stratum/layers/b", "/var/lib/stratum/layers/c"],
        &["/x/1", "/x/2", "/x/3", "/x/4", "/x/5", "/x/6", "/x/7", "/x/8"],
    ];

    for layers in stacks {
        for index_flag in [None, Some("index=off")] {
            let stack = LayerStack::new(layers.iter().copied());
            let request = MountRequest::new("/var/lib/stratum/b1", "/var/lib/stratum/up", stack.clone());
            let options = MountOptions::new(&request, index_flag);
            let line = mount_line("/var/lib/stratum/b1", &options);

            let info = parse_mount_line(&line, "/var/lib/stratum/b1").expect("should parse");
            assert_eq!(info.lowers, stack, "line: {line}");
            assert_eq!(info.upper, request.upper_dir);
            assert_eq!(info.target, Path::new("/var/lib/stratum/b1"));
        }
    }
}

#[test]
fn documented_example_round_trips() {
    let request = MountRequest::new("/merged", "/up", LayerStack::new(["base", "app"]));
    let options = MountOptions::new(&request, None);
    assert_eq!(
        options.to_string(),
        "lowerdir=app:base,upperdir=/up,workdir=/merged/work"
    );

    let info = parse_mount_line(&format!("/merged {options}"), "/merged").expect("should parse");
    assert_eq!(info.upper, Path::new("/up"));
    assert_eq!(info.lowers, LayerStack::new(["base", "app"]));
}

#[test]
fn selection_then_parse_picks_the_exact_mount() {
    let near = MountRequest::new("/builds/a-old", "/up/old", LayerStack::new(["/l/old"]));
    let wanted = MountRequest::new("/builds/a", "/up/a", LayerStack::new(["/l/1", "/l/2"]));
    let table = format!(
        "{}\n{}\n",
        mount_line("/builds/a-old", &MountOptions::new(&near, None)),
        mount_line("/builds/a", &MountOptions::new(&wanted, None)),
    );

    let line = select_line(&table, "/builds/a").expect("should select");
    let info = parse_mount_line(line, "/builds/a").expect("should parse");
    assert_eq!(info.upper, Path::new("/up/a"));
    assert_eq!(info.lowers, wanted.layers);
}
