// ── CSV export ──
//
// One header row, then one row per ingress LSP. The `paths` column holds
// the name of the active path only.

use std::io::Write;

use crate::error::ExportError;
use crate::model::{LabelSwitchedPath, LspSnapshot};

pub const CSV_HEADER: [&str; 15] = [
    "device",
    "name",
    "state",
    "session_role",
    "source_address",
    "destination_address",
    "metric",
    "bandwidth",
    "fast_reroute",
    "link_protection",
    "node_protection",
    "description",
    "route_count",
    "lsp_type",
    "paths",
];

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn record(device: &str, lsp: &LabelSwitchedPath) -> [String; 15] {
    [
        device.to_owned(),
        lsp.name.clone(),
        lsp.state.to_string(),
        lsp.session_role.to_string(),
        opt(lsp.source_address),
        opt(lsp.destination_address),
        opt(lsp.metric),
        opt(lsp.bandwidth),
        lsp.fast_reroute.to_string(),
        lsp.link_protection.to_string(),
        lsp.node_protection.to_string(),
        lsp.description.clone().unwrap_or_default(),
        opt(lsp.route_count),
        lsp.lsp_type.clone().unwrap_or_default(),
        opt(lsp.active().map(|p| p.name.as_str())),
    ]
}

/// Write every ingress LSP of `snapshots` as CSV. Returns the row count.
pub fn write_csv<'a, W, I>(writer: W, snapshots: I) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a LspSnapshot>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for snapshot in snapshots {
        for lsp in snapshot.ingress() {
            csv.write_record(record(snapshot.device.as_str(), lsp))?;
            rows += 1;
        }
    }
    csv.flush()?;
    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceId, LspPath, LspState, SessionRole};
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_header_and_ingress_rows() {
        let lsps = vec![
            LabelSwitchedPath {
                name: "to-pe2".into(),
                state: LspState::Up,
                source_address: Some("10.0.0.1".parse().unwrap()),
                destination_address: Some("10.0.0.2".parse().unwrap()),
                bandwidth: Some("100m".parse().unwrap()),
                description: Some("core, east".into()),
                paths: vec![LspPath {
                    name: "via-p1".into(),
                    is_active: true,
                    ..LspPath::default()
                }],
                ..LabelSwitchedPath::default()
            },
            LabelSwitchedPath {
                name: "transit".into(),
                session_role: SessionRole::Transit,
                ..LabelSwitchedPath::default()
            },
        ];
        let snap = LspSnapshot::new(DeviceId::from("pe1"), lsps);

        let mut out = Vec::new();
        let rows = write_csv(&mut out, [&snap]).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some(
                "pe1,to-pe2,Up,ingress,10.0.0.1,10.0.0.2,,100m,false,false,false,\"core, east\",,,via-p1"
            )
        );
        assert_eq!(lines.next(), None);
    }
}
