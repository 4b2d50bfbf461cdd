use pretty_assertions::assert_eq;
use symbols::{extract_signatures, extract_skeleton};

const PANEL: &str = r#"import React, { useState } from "react";

export interface Props {
  label: string;
}

export function Button({ label }: Props): JSX.Element {
  const [count, setCount] = useState(0);
  return <button onClick={() => setCount(count + 1)}>{label}</button>;
}

export const double = (n: number): number => n * 2;

const LIMIT = 10;

export default class Panel extends React.Component<Props> {
  state = { open: false };

  toggle(): void {
    this.setState({ open: !this.state.open });
  }

  render() {
    return <div />;
  }
}
"#;

#[test]
fn test_signatures() {
    let outline = extract_signatures(PANEL, "Panel.tsx");

    assert_eq!(outline.error, None);
    assert_eq!(
        outline.lines,
        vec![
            "export interface Props { label: string; }",
            "export function Button({ label }: Props): JSX.Element",
            "export const double = (n: number): number =>",
            "export default class Panel extends React.Component<Props>",
            "  toggle(): void",
            "  render()",
        ]
    );
}

#[test]
fn test_skeleton() {
    let outline = extract_skeleton(PANEL, "Panel.tsx");

    insta::assert_snapshot!(outline.to_string(), @r###"
    import React, { useState } from "react";
    export interface Props { label: string; }
    export function Button({ label }: Props): JSX.Element { … }
    export const double = (n: number): number => …
    const LIMIT = 10
    export default class Panel extends React.Component<Props> {
      state = { open: false }
      toggle(): void { … }
      render() { … }
    }
    "###);
}

#[test]
fn test_skeleton_keeps_reexports_and_types() {
    let source = r#"export { a, b } from "./ab";
export * from "./all";
type Id = string | number;
enum Color { Red, Green }
"#;
    let outline = extract_skeleton(source, "index.ts");

    assert_eq!(
        outline.lines,
        vec![
            r#"export { a, b } from "./ab";"#,
            r#"export * from "./all";"#,
            "type Id = string | number;",
            "enum Color { Red, Green }",
        ]
    );
}

#[test]
fn test_anonymous_default_export() {
    let outline = extract_signatures("export default function () { return 1; }", "anon.js");
    assert_eq!(outline.lines, vec!["export default function ()"]);
}

#[test]
fn test_long_lines_are_truncated() {
    let params: Vec<String> = (0..60).map(|i| format!("arg{i}: number")).collect();
    let source = format!("function wide({}) {{}}", params.join(", "));
    let outline = extract_signatures(&source, "wide.ts");

    let line = &outline.lines[0];
    assert!(line.ends_with('…'));
    assert!(line.chars().count() <= 180);
}

#[test]
fn test_outlines_report_parse_errors() {
    assert!(extract_signatures(")))(((", "x.ts").is_failed());
    assert!(extract_skeleton(")))(((", "x.ts").is_failed());
    assert!(extract_skeleton("", "x.ts").is_empty());
}

#[test]
fn test_member_lines_respect_the_cap_with_indent() {
    let params: Vec<String> = (0..60).map(|i| format!("arg{i}: number")).collect();
    let source = format!("class Wide {{\n  method({}) {{}}\n}}\n", params.join(", "));

    for outline in [
        extract_signatures(&source, "wide.ts"),
        extract_skeleton(&source, "wide.ts"),
    ] {
        let member = &outline.lines[1];
        assert!(member.starts_with("  method("), "{member}");
        assert!(member.ends_with('…'));
        assert_eq!(member.chars().count(), 180);
    }
}
