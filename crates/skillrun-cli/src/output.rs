use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Left-aligned columns separated by two spaces. The last column is not
/// padded so long descriptions don't leave trailing whitespace.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| {
        let last = cells.len().saturating_sub(1);
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == last {
                    c.to_string()
                } else {
                    format!("{:width$}", c, width = widths[i])
                }
            })
            .collect();
        println!("{}", line.join("  "));
    };

    render(headers.to_vec());
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    render(sep.iter().map(String::as_str).collect());
    for row in rows {
        render(row.iter().take(widths.len()).map(String::as_str).collect());
    }
}
