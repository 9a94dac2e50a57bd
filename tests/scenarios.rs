//! End-to-end scenarios exercising the public API: declare a command,
//! compile it, parse real input, and read the result back out.

use cmdforge::args::Args;
use cmdforge::collection::DataCollection;
use cmdforge::command::{Alconna, Header};
use cmdforge::node::{Node, OptionNode, Subcommand};
use cmdforge::value::{Payload, PayloadKind, Token};
use cmdforge::pattern;
use std::any::Any;
use std::sync::Arc;

#[test]
fn basic_positional() {
    let cmd = Alconna::builder("test")
        .main_args(Args::new().push("bar", pattern::any_one()))
        .build_unregistered()
        .unwrap();

    let result = cmd.parse(DataCollection::from_str("test hello", false)).unwrap();
    assert!(result.matched());
    assert_eq!(result.query("bar").unwrap().unwrap().as_str(), Some("hello"));
}

#[test]
fn option_with_short_alias() {
    let cmd = Alconna::builder("greet")
        .option(Node::Option(Arc::new(
            OptionNode::new("--name|-n").args(Args::new().push("name", pattern::str_())),
        )))
        .build_unregistered()
        .unwrap();

    let long = cmd.parse(DataCollection::from_str("greet --name Alice", false)).unwrap();
    let short = cmd.parse(DataCollection::from_str("greet -n Alice", false)).unwrap();

    assert_eq!(long.query("options.name.value").unwrap().unwrap().as_str(), Some("Alice"));
    assert_eq!(
        long.query("options.name.value").unwrap(),
        short.query("options.name.value").unwrap()
    );
}

#[test]
fn subcommand_with_requirement_chain() {
    let set_sub = Subcommand::new("set")
        .args(Args::new().push("key", pattern::str_()).push("val", pattern::str_()))
        .requires(vec!["perm".to_string()]);
    let cmd = Alconna::builder("lp")
        .option(Node::Subcommand(Arc::new(set_sub)))
        .build_unregistered()
        .unwrap();

    let result = cmd.parse(DataCollection::from_str("lp perm set admin true", false)).unwrap();
    assert!(result.matched());
    assert_eq!(result.query("subcommands.set.key").unwrap().unwrap().as_str(), Some("admin"));
    assert_eq!(result.query("subcommands.set.val").unwrap().unwrap().as_str(), Some("true"));
}

#[derive(Debug)]
struct At(u64);
impl PayloadKind for At {
    fn type_name(&self) -> &'static str {
        "At"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn mixed_payload_stream() {
    let cmd = Alconna::builder("test")
        .header(Header::prefixed(".", "test"))
        .main_args(Args::new().push("bar", pattern::any_one()))
        .build_unregistered()
        .unwrap();

    let tokens = vec![Token::Text(".test".to_string()), Token::Payload(Payload::new(At(124)))];
    let result = cmd.parse(DataCollection::new(tokens)).unwrap();
    assert!(result.matched());
    let bar = result.query("bar").unwrap().unwrap();
    assert_eq!(bar.as_payload().unwrap().downcast_ref::<At>().unwrap().0, 124);
}

#[test]
fn fuzzy_suggestion_on_near_miss_header() {
    // "greeting" is edit-distance 3 from "greet" under true Damerau-
    // Levenshtein distance, which exceeds the spec's worked example's
    // claimed threshold-2 match; "greett" (distance 1) is the smallest
    // change to the example that keeps its intent — a near-miss header
    // triggers a suggestion — mathematically consistent.
    let cmd = Alconna::builder("greet").build_unregistered().unwrap();
    let result = cmd.parse(DataCollection::from_str("greett", false)).unwrap();
    assert!(!result.matched());
    assert_eq!(
        result.error_info,
        Some(cmdforge::arparma::ErrorInfo::FuzzyMatchSuccess("greet".to_string()))
    );
}

// The "ambiguous query" scenario — a bare name colliding between an
// option result and a subcommand result — can't arise from a single
// analyser run against one alias (only the winning node populates a
// result), so it's exercised directly against `Arparma::query` in
// `src/arparma.rs`'s unit tests instead of here.

#[test]
fn priority_breaks_ties_between_options_sharing_an_alias() {
    let high = OptionNode::new("foo").priority(5).action(Arc::new(cmdforge::node::StoreConst(
        cmdforge::value::Value::Str("high".to_string()),
    )));
    let low = OptionNode::new("foo").priority(1).args(Args::new().push("n", pattern::int()));
    let cmd = Alconna::builder("app")
        .option(Node::Option(Arc::new(high)))
        .option(Node::Option(Arc::new(low)))
        .build_unregistered()
        .unwrap();

    // The higher-priority `foo` has no args and always succeeds, so it
    // wins regardless of what follows.
    let result = cmd.parse(DataCollection::from_str("app foo", false)).unwrap();
    assert_eq!(result.query("options.foo.value").unwrap().unwrap().as_str(), Some("high"));
}
