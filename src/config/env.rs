use toml::{Table, Value};

/// Merges `PREFIX<sep>A<sep>B=value` variables into `table` at path `a.b`.
///
/// Values are inserted as strings; deserialization into the settings type
/// decides what they mean.
pub(super) fn load_env_vars(table: &mut Table, prefix: &str, separator: &str) {
    load_from(table, prefix, separator, std::env::vars());
}

fn load_from(
    table: &mut Table,
    prefix: &str,
    separator: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) {
    if separator.is_empty() {
        return;
    }
    let prefix_with_sep = format!("{prefix}{separator}");

    for (key, value) in vars {
        let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
            continue;
        };
        if path_str.is_empty() {
            continue;
        }

        let path: Vec<String> = path_str
            .split(separator)
            .map(|s| s.to_lowercase())
            .collect();
        if path.iter().any(|segment| segment.is_empty()) {
            continue;
        }

        insert_at_path(table, &path, Value::String(value));
    }
}

fn insert_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        table.insert(first.clone(), value);
        return;
    }

    if !matches!(table.get(first), Some(Value::Table(_))) {
        table.insert(first.clone(), Value::Table(Table::new()));
    }

    if let Some(Value::Table(nested)) = table.get_mut(first) {
        insert_at_path(nested, rest, value);
    }
}
