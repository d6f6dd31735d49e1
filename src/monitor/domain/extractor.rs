//! Builds [`VmRecord`]s from raw VM configuration and live status payloads.

use std::{cmp::Ordering, collections::BTreeMap};

use serde_json::Value;

use super::{
    model::{DiskInfo, NetworkInterface, VmRecord},
    units::{bytes_to_gb, format_uptime, numeric_or_default, parse_disk_size},
};
use crate::core::domain::model::vm::{RawRecord, VmListItem};

const DISK_PREFIXES: [&str; 4] = ["scsi", "virtio", "ide", "sata"];
const NET_PREFIXES: [&str; 1] = ["net"];

/// Where a VM was found.
#[derive(Debug, Clone, Copy)]
pub struct VmLocation<'a> {
    pub server: &'a str,
    pub node: &'a str,
}

/// Produces a complete record for one VM. Never fails.
///
/// `live` is the `status/current` payload and is only consulted when the
/// listing reports the VM as running.
pub fn extract_vm_record(
    location: VmLocation<'_>,
    item: &VmListItem,
    config: &RawRecord,
    live: Option<&RawRecord>,
) -> VmRecord {
    let memory_mb = numeric_or_default(config.get("memory"), 0.0);
    let disks = extract_disks(config);
    let disk_gb = disks.iter().map(|d| d.size_gb).sum();

    let name = item
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| text_field(config, "name"))
        .unwrap_or_else(|| "N/A".to_string());

    let mut record = VmRecord {
        server: location.server.to_string(),
        node: location.node.to_string(),
        vmid: item.vmid,
        name,
        status: item.status.clone(),
        cpu_cores: numeric_or_default(config.get("cores"), 1.0),
        sockets: numeric_or_default(config.get("sockets"), 1.0),
        memory_mb,
        memory_gb: memory_mb / 1024.0,
        disk_gb,
        disks,
        networks: extract_networks(config),
        boot_order: text_or_na(config, "boot"),
        os_type: text_or_na(config, "ostype"),
        machine: text_or_na(config, "machine"),
        bios: text_or_na(config, "bios"),
        agent: text_or_na(config, "agent"),
        template: numeric_or_default(config.get("template"), 0.0) == 1.0,
        description: text_field(config, "description").unwrap_or_default(),
        tags: text_field(config, "tags")
            .or_else(|| item.tags.clone())
            .unwrap_or_default(),
        cpu_usage_percent: 0.0,
        uptime_seconds: 0.0,
        uptime_formatted: "Stopped".to_string(),
        memory_used_bytes: 0.0,
        memory_used_gb: 0.0,
        memory_max_bytes: 0.0,
        memory_max_gb: 0.0,
    };

    if record.is_running() {
        match live {
            Some(live) => apply_live_status(&mut record, live),
            None => record.uptime_formatted = "N/A".to_string(),
        }
    }

    record
}

fn apply_live_status(record: &mut VmRecord, live: &RawRecord) {
    let uptime = numeric_or_default(live.get("uptime"), 0.0);
    let mem = numeric_or_default(live.get("mem"), 0.0);
    let maxmem = numeric_or_default(live.get("maxmem"), 0.0);

    record.cpu_usage_percent = numeric_or_default(live.get("cpu"), 0.0) * 100.0;
    record.uptime_seconds = uptime;
    record.uptime_formatted = format_uptime(uptime);
    record.memory_used_bytes = mem;
    record.memory_used_gb = bytes_to_gb(mem);
    record.memory_max_bytes = maxmem;
    record.memory_max_gb = bytes_to_gb(maxmem);
}

/// Disk interfaces in `(prefix, index)` order.
pub fn extract_disks(config: &RawRecord) -> Vec<DiskInfo> {
    interface_entries(config, &DISK_PREFIXES)
        .into_iter()
        .map(|(interface, raw)| {
            let first = raw.split(',').next().unwrap_or_default();
            let (storage, volume) = match first.split_once(':') {
                Some((pool, volume)) => (pool.to_string(), Some(volume.to_string())),
                None => (first.to_string(), None),
            };
            let size_gb = raw
                .split(',')
                .find(|segment| segment.contains("size="))
                .and_then(|segment| segment.split('=').nth(1))
                .map(parse_disk_size)
                .unwrap_or(0.0);

            DiskInfo {
                interface: interface.to_string(),
                storage,
                volume,
                size_gb,
                raw_config: raw,
            }
        })
        .collect()
}

/// Network interfaces in index order.
pub fn extract_networks(config: &RawRecord) -> Vec<NetworkInterface> {
    interface_entries(config, &NET_PREFIXES)
        .into_iter()
        .map(|(interface, raw)| {
            let mut model = None;
            let mut attributes = BTreeMap::new();
            for segment in raw.split(',').filter(|s| !s.is_empty()) {
                match segment.split_once('=') {
                    Some((key, value)) => {
                        attributes.insert(key.to_string(), value.to_string());
                    }
                    None => model = Some(segment.to_string()),
                }
            }

            NetworkInterface {
                interface: interface.to_string(),
                model,
                attributes,
                raw_config: raw,
            }
        })
        .collect()
}

/// Keys made of one of `prefixes` plus a decimal index, with a non-empty
/// value, sorted by prefix then numeric index.
fn interface_entries<'a>(config: &'a RawRecord, prefixes: &[&str]) -> Vec<(&'a str, String)> {
    let mut entries: Vec<(&str, &str, &str, String)> = config
        .iter()
        .filter_map(|(key, value)| {
            let (prefix, index) = split_interface_key(key, prefixes)?;
            let raw = value_text(value).filter(|raw| !raw.is_empty())?;
            Some((key.as_str(), prefix, index, raw))
        })
        .collect();

    entries.sort_by(|a, b| a.1.cmp(b.1).then_with(|| compare_index(a.2, b.2)));
    entries
        .into_iter()
        .map(|(key, _, _, raw)| (key, raw))
        .collect()
}

/// Orders decimal digit strings numerically without parsing them.
fn compare_index(a: &str, b: &str) -> Ordering {
    let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
    ta.len()
        .cmp(&tb.len())
        .then_with(|| ta.cmp(tb))
        .then_with(|| a.len().cmp(&b.len()))
}

fn split_interface_key<'k>(key: &'k str, prefixes: &[&str]) -> Option<(&'k str, &'k str)> {
    prefixes.iter().find_map(|prefix| {
        let index = key.strip_prefix(*prefix)?;
        (!index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
            .then(|| (&key[..prefix.len()], index))
    })
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn text_field(config: &RawRecord, key: &str) -> Option<String> {
    config
        .get(key)
        .and_then(value_text)
        .filter(|text| !text.is_empty())
}

fn text_or_na(config: &RawRecord, key: &str) -> String {
    text_field(config, key).unwrap_or_else(|| "N/A".to_string())
}
