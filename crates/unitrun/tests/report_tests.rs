// Integration tests for the reporters driven by real registered tests

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serial_test::serial;
use unitrun::prelude::*;
use unitrun::{run_suite_with, ConsoleReporter, JsonReporter, Reporter, XmlReporter};

suite!(Planets {
    test_case! {
        fn earth_is_round(t) {
            check!(t, true);
        }
    }

    test_case! {
        fn mars_has_oceans(t) {
            check_ex!(t, false, "no <oceans> & \"water\"");
        }
    }
});

/// Replace the value of `attr="..."` on every line with `*`
fn mask_attr(doc: &str, attr: &str) -> String {
    let needle = format!("{}=\"", attr);
    doc.lines()
        .map(|line| match line.find(&needle) {
            Some(start) => {
                let value_start = start + needle.len();
                let value_end = value_start + line[value_start..].find('"').unwrap();
                format!("{}*{}", &line[..value_start], &line[value_end..])
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn mask_element(doc: &str, element: &str) -> String {
    let open = format!("<{}>", element);
    doc.lines()
        .map(|line| match line.find(&open) {
            Some(start) => format!("{}{}*</{}>", &line[..start], open, element),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize(doc: &str) -> String {
    let doc = mask_attr(doc, "duration");
    let doc = mask_attr(&doc, "time_ms");
    let doc = mask_attr(&doc, "message");
    let doc = mask_element(&doc, "start-time");
    let doc = mask_element(&doc, "command-line");
    mask_element(&doc, "end-time")
}

#[test]
#[serial]
fn test_xml_document() {
    let mut reporter = XmlReporter::new(Vec::new());
    let failed = run_suite_with("Planets", &mut reporter, 0).unwrap();
    assert_eq!(failed, 1);

    let doc = String::from_utf8(reporter.into_inner()).unwrap();
    assert_snapshot!(normalize(&doc), @r#"
<?xml version="1.0" encoding="UTF-8"?>
<unitrun-results total="2" failed="1" failures="1" duration="*">
 <start-time>*</start-time>
 <command-line>*</command-line>
 <suite name="Planets">
  <test name="earth_is_round" time_ms="*"/>
  <test name="mars_has_oceans" time_ms="*">
   <failure message="*"/>
  </test>
 </suite>
 <end-time>*</end-time>
</unitrun-results>
"#);

    assert_eq!(doc.matches("<failure ").count(), 1);
    let failure = doc.lines().find(|l| l.contains("<failure ")).unwrap();
    assert!(failure.contains("report_tests.rs("));
    assert!(failure.ends_with(") : no &lt;oceans&gt; &amp; &quot;water&quot;\"/>"));
}

#[test]
#[serial]
fn test_xml_command_line_is_escaped() {
    let mut reporter =
        XmlReporter::new(Vec::new()).with_command_line("planets --suite \"Planets\" > out.xml");
    run_suite_with("Planets", &mut reporter, 0).unwrap();

    let doc = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = doc.lines().collect();
    assert!(lines[2].starts_with(" <start-time>"));
    assert_eq!(
        lines[3],
        " <command-line>planets --suite &quot;Planets&quot; &gt; out.xml</command-line>"
    );
}

#[test]
#[serial]
fn test_xml_empty_suite_self_closes() {
    // Empty suites have no registrations, so build one by hand
    let mut reporter = XmlReporter::new(Vec::new());
    {
        let ctx = TestContext::new(&mut reporter);
        let empty = unitrun::Suite::new("Empty");
        empty.run_tests(&ctx, 0);
    }
    reporter.summary();

    let doc = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(doc.contains(" <suite name=\"Empty\" />\n"));
    assert!(!doc.contains("</suite>"));
}

#[test]
#[serial]
fn test_json_report() {
    let mut reporter = JsonReporter::new(Vec::new());
    run_suite_with("Planets", &mut reporter, 0).unwrap();

    let report: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
    assert_eq!(report["total"], 2);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["suites"][0]["name"], "Planets");

    let tests = report["suites"][0]["tests"].as_array().unwrap();
    assert_eq!(tests[0]["name"], "earth_is_round");
    assert_eq!(tests[0]["passed"], true);
    assert_eq!(tests[1]["passed"], false);
    assert_eq!(
        tests[1]["failures"][0]["message"],
        "no <oceans> & \"water\""
    );
}

#[test]
#[serial]
fn test_console_report() {
    let mut reporter = ConsoleReporter::new(Vec::new()).with_trace(true);
    let failed = run_suite_with("Planets", &mut reporter, 0).unwrap();
    assert_eq!(failed, 1);

    let out = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Suite starting: Planets");
    assert_eq!(lines[1], "Test starting: earth_is_round");
    assert!(lines[2].starts_with("Test finished: earth_is_round ("));
    assert_eq!(lines[3], "Test starting: mars_has_oceans");
    assert_eq!(lines[4], "Failure in suite Planets test mars_has_oceans");
    assert!(lines[5].ends_with(": no <oceans> & \"water\""));
    assert!(out.contains("FAILURE: 1 out of 2 tests failed (1 failures)."));
    assert!(out.contains("Run time: "));
}
