//! Whole-file scenarios: realistic configuration files parsed and queried
//! through the public API.

use pretty_assertions::assert_eq;
use sectconf_core::{Config, Construct, Document, ErrorKind, SearchPath, Value};

const ANALYTICS: &str = r#"  var _gaq = _gaq || [];
  _gaq.push(['_setAccount', 'UA-XXXXX-X']);
  _gaq.push(['_trackPageview']);

  (function() {
    var ga = document.createElement('script'); ga.type = 'text/javascript'; ga.async = true;
    ga.src = ('https:' == document.location.protocol ? 'https://ssl' : 'http://www') + '.google-analytics.com/ga.js';
    var s = document.getElementsByTagName('script')[0]; s.parentNode.insertBefore(ga, s);
  })();"#;

#[test]
fn multiline_values() {
    let text = format!(
        r#"# Simple quoted multi-line value
quoted="r1
r2
3"

# Complex multi-line value with HTML
html: <<<HTML
<div class="x">x</div>
line2
HTML

# Multi-line value with fake terminator
value2: <<<HTML
HTML HTML
 HTML

HTML

# Empty value
value3: <<<HTML
HTML;

# Long and complicated value
analytics: <<<HTML
{}
HTML
"#,
        ANALYTICS
    );

    let config = Config::parse(&text).unwrap();

    for key in ["quoted", "html", "value2", "value3", "analytics"] {
        assert!(config.is_defined(key), "{} should be defined", key);
    }
    assert_eq!(config.get_str("quoted"), Some("r1\nr2\n3"));
    assert_eq!(config.get_str("html"), Some("<div class=\"x\">x</div>\nline2"));
    assert_eq!(config.get_str("value2"), Some("HTML HTML\n HTML\n"));
    assert_eq!(config.get_str("value3"), Some(""));
    assert_eq!(config.get_str("analytics"), Some(ANALYTICS));
}

#[test]
fn comments_and_blank_lines() {
    let text = r#"
# Regular option
username= jeke   // C++ comment

pass=12# End of line comment

# Commented option
#id=234

/*
* Commented options
sup=234
jeke=3
*/

# C-style comments allow option to be broken into several lines
/*comment1*/ optionx /*comment2
continued*/ = /*comment3
continued*/ 2/*comment in the middle of value?!?*/5

"#;
    let config = Config::parse(text).unwrap();

    assert!(config.is_defined("username"));
    assert!(config.is_defined("pass"));
    assert!(config.is_defined("optionx"));
    assert!(!config.is_defined("id"));
    assert!(!config.is_defined("sup"));
    assert!(!config.is_defined("jeke"));

    assert_eq!(config.get_str("username"), Some("jeke"));
    assert_eq!(config.get_or("pass", "").to_string(), "12");
    assert_eq!(config.get_or("optionx", "").to_string(), "25");
}

#[test]
fn conversion() {
    let text = "beta:true\ngamma:false\ntheta:\"false\"\nxray:\"null\"\nval:24\nflt:3.33\nhexa:0xff\noct:0100";
    let config = Config::parse(text).unwrap();

    assert_eq!(config.get("beta"), Some(&Value::Bool(true)));
    assert_eq!(config.get("gamma"), Some(&Value::Bool(false)));
    assert_eq!(config.get("theta"), Some(&Value::from("false")));
    assert_eq!(config.get("xray"), Some(&Value::from("null")));
    assert_eq!(config.get("val"), Some(&Value::Integer(24)));
    assert!(config.get("flt").is_some_and(Value::is_float));
    assert!((config.get_f64("flt").unwrap() - 3.33).abs() < 0.0001);
    assert_eq!(config.get_i64("hexa"), Some(255));
    assert_eq!(config.get_i64("oct"), Some(64));
}

#[test]
fn sections_and_search_order() {
    let text = r#"[global]
x:4
second:2

[app-config]
x: "25"

[anothersection]
x: 999
second: 888
"#;
    let config =
        Config::parse_with_search_path(text, SearchPath::from_sections(["app-config"])).unwrap();

    assert!(config.is_defined("x"));
    assert_eq!(config.get_or("x", Value::Null), Value::from("25"));
    assert!(config.is_defined("second"));
    assert_eq!(config.get_i64("second"), Some(2));
    assert_eq!(config.get_i64("anothersection.x"), Some(999));
    assert_eq!(config.get_i64("global.x"), Some(4));
}

#[test]
fn sanity() {
    let config = Config::parse("x:4\nsecond:hep").unwrap();

    assert!(config.is_defined("x"));
    assert_eq!(config.get_or("x", Value::Null), Value::Integer(4));
    assert_eq!(config.get_str("second"), Some("hep"));
    assert!(!config.is_defined("dummy"));
    assert_eq!(config.get_or("dummy", "default"), Value::from("default"));
    assert_eq!(config.get_or("dummy", ""), Value::from(""));
    assert!(!config.is_defined("spa.x"));
    assert_eq!(config.get_or("spa.x", ""), Value::from(""));
}

#[test]
fn quoted_strings_survive_requoting() {
    let original = "line one\n\"quoted\" and back\\slash\n\ttabbed";
    let escaped = original.replace('\\', "\\\\").replace('"', "\\\"");
    let doc = Document::parse(&format!("v = \"{}\"\n", escaped)).unwrap();
    assert_eq!(doc.get("global.v"), Some(&Value::from(original)));
}

#[test]
fn malformed_files_fail_whole() {
    let cases = [
        ("good = 1\nbad = \"open\n", Construct::QuotedString, 15),
        ("good = 1\n/* open comment\n", Construct::Comment, 9),
        ("good = 1\nblock = <<<EOF\ntext\n", Construct::MultilineBlock, 17),
    ];
    for (text, construct, offset) in cases {
        let err = Document::parse(text).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedConstruct(construct), "{:?}", text);
        assert_eq!(err.offset, Some(offset), "{:?}", text);
    }
}
