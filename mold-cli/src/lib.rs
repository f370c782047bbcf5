use anyhow::{Context, Result};
use mold_dom::serialize::to_html;
use mold_dom::Document;
use mold_template::{Bindings, ParseOptions, Template};
use std::fs;
use std::path::Path;

/// Parses `name=value` as given to `--set`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty placeholder name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Assignments first, then clears, so `--clear x` wins over `--set x=..`.
pub fn collect_bindings(sets: &[(String, String)], clears: &[String]) -> Bindings {
    let mut bindings = Bindings::new();
    for (k, v) in sets {
        bindings.insert(k.clone(), v.clone());
    }
    for k in clears {
        bindings.insert(k.clone(), None::<String>);
    }
    bindings
}

fn read_template(input: &Path, opts: &ParseOptions) -> Result<Template> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    Template::with_options(&src, opts).with_context(|| format!("failed to parse {}", input.display()))
}

/// Materializes the template in `input`, applies `bindings` and returns the
/// serialized tree.
pub fn render_cmd(input: &Path, bindings: &Bindings, opts: &ParseOptions) -> Result<String> {
    let mut tpl = read_template(input, opts)?;
    let mut doc = Document::new();
    let roots = tpl.create(&mut doc)?;

    for name in tpl.placeholders() {
        if bindings.get(name).is_none() {
            log::info!("placeholder `{name}` has no value, rendering it empty");
        }
    }
    let writes = tpl.update(&mut doc, bindings);
    log::debug!("{} root node(s), {} write(s)", roots.len(), writes);

    Ok(to_html(&doc, &roots))
}

/// Distinct placeholder names in `input`, in document order.
pub fn placeholders_cmd(input: &Path, opts: &ParseOptions) -> Result<Vec<String>> {
    let tpl = read_template(input, opts)?;
    Ok(tpl.placeholders().into_iter().map(str::to_string).collect())
}

/// Parses `input` and reports the number of root descriptors.
pub fn check_cmd(input: &Path, opts: &ParseOptions) -> Result<usize> {
    let tpl = read_template(input, opts)?;
    Ok(tpl.descriptors().len())
}
