//! Template Substitution
//!
//! `$name` is replaced by the value bound to `name`. When several names
//! prefix the text after `$`, the longest wins. `$$` is a literal `$`.

use std::collections::HashMap;

pub fn replace_vars(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(index) = rest.find('$') {
        out.push_str(&rest[..index]);
        rest = &rest[index + 1..];

        let best = vars
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once(("$", "$")))
            .filter(|(k, _)| !k.is_empty() && rest.starts_with(k))
            .max_by_key(|(k, _)| k.len());

        match best {
            Some((k, v)) => {
                out.push_str(v);
                rest = &rest[k.len()..];
            }
            None => {
                log::warn!("unknown variable at ${}", rest);
                out.push('$');
            }
        }
    }

    out.push_str(rest);
    out
}
