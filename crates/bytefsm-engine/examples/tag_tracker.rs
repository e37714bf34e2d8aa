// Demo: a miniature HTML security-context tracker built on the engine.
//
// Three contexts are tracked: plain text, tag name, and attribute region.
// Tag names are accumulated into a ByteStr and printed as they close.
//
// Run:
//   cargo run -p bytefsm-engine --example tag_tracker

use bytefsm_bytestr::ByteStr;
use bytefsm_engine::{Condition, Context, Definition, Transition};

const TEXT: u8 = 0;
const TAG_NAME: u8 = 1;
const ATTR: u8 = 2;

struct Tracker {
    name: ByteStr,
}

fn build_definition() -> Definition<Tracker> {
    let mut def: Definition<Tracker> = Definition::new(3).unwrap();

    // Catch-all self loops first, specific edges layered on top.
    def.populate(&[
        Transition::new(Condition::Any, TEXT, TEXT),
        Transition::new(Condition::Any, ATTR, ATTR),
    ])
    .expect("catch-all transitions");
    def.populate(&[
        Transition::new(Condition::Byte(b'<'), TEXT, TAG_NAME),
        Transition::new(Condition::Range(b'a', b'z'), TAG_NAME, TAG_NAME),
        Transition::new(Condition::Range(b'A', b'Z'), TAG_NAME, TAG_NAME),
        Transition::new(Condition::Byte(b'/'), TAG_NAME, TAG_NAME),
        Transition::new(Condition::Set(b" \t\r\n"), TAG_NAME, ATTR),
        Transition::new(Condition::Byte(b'>'), TAG_NAME, TEXT),
        Transition::new(Condition::Byte(b'>'), ATTR, TEXT),
    ])
    .expect("markup transitions");

    def.on_enter(TAG_NAME, |ctx, _, _, _| ctx.user.name.clear())
        .expect("enter hook");
    def.on_each_byte(TAG_NAME, |ctx, _, byte, _| ctx.user.name.push(byte))
        .expect("each-byte hook");
    def.on_exit(TAG_NAME, |ctx, _, _, next| {
        let name = String::from_utf8_lossy(ctx.user.name.strip()).into_owned();
        let region = if next == ATTR { "attributes follow" } else { "tag closed" };
        println!("  tag `{name}` ({region})");
    })
    .expect("exit hook");

    def
}

fn main() {
    let def = build_definition();
    let mut ctx = Context::new(&def, Tracker { name: ByteStr::new() });

    let input: &[u8] = b"Hello <b>world</b>, <a href=\"/x\">link</a>!";
    println!("input: {}", String::from_utf8_lossy(input));

    match ctx.parse(input) {
        Ok(consumed) => println!("consumed {consumed} bytes, final state {}", ctx.state()),
        Err(err) => {
            eprintln!("parse failed: {err}");
            std::process::exit(1);
        }
    }
}
