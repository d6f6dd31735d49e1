use serde::{Deserialize, Serialize};

use super::model::VmRecord;

/// Summary figures over a list of VM records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VmStatistics {
    pub total: usize,
    pub running: usize,
    pub stopped: usize,
    pub templates: usize,
    /// Cores assigned to running VMs.
    pub running_cores: f64,
    /// Memory assigned to running VMs, in GB.
    pub running_memory_gb: f64,
    /// Mean live CPU usage of running VMs, in percent.
    pub average_cpu_usage: f64,
    /// Disk assigned to all VMs, in GB.
    pub total_disk_gb: f64,
    /// OS type to VM count, most common first. Templates are not counted.
    pub os_distribution: Vec<(String, usize)>,
}

impl VmStatistics {
    pub fn from_records(records: &[VmRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        let mut cpu_usage_sum = 0.0;

        for record in records {
            if record.is_running() {
                stats.running += 1;
                stats.running_cores += record.cpu_cores;
                stats.running_memory_gb += record.memory_gb;
                cpu_usage_sum += record.cpu_usage_percent;
            } else {
                stats.stopped += 1;
            }
            if record.template {
                stats.templates += 1;
            } else {
                let os = if record.os_type == "N/A" {
                    "Unknown"
                } else {
                    record.os_type.as_str()
                };
                match stats.os_distribution.iter_mut().find(|(name, _)| name == os) {
                    Some((_, count)) => *count += 1,
                    None => stats.os_distribution.push((os.to_string(), 1)),
                }
            }
            stats.total_disk_gb += record.disk_gb;
        }

        if stats.running > 0 {
            stats.average_cpu_usage = cpu_usage_sum / stats.running as f64;
        }
        stats
            .os_distribution
            .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::vm_record;

    #[test]
    fn test_statistics() {
        let mut records = vec![
            vm_record(1, "running", 4.0, 8.0, 100.0),
            vm_record(2, "running", 2.0, 4.0, 50.0),
            vm_record(3, "stopped", 8.0, 16.0, 200.0),
            vm_record(4, "stopped", 1.0, 1.0, 10.0),
        ];
        records[0].cpu_usage_percent = 30.0;
        records[1].cpu_usage_percent = 10.0;
        records[0].os_type = "l26".to_string();
        records[1].os_type = "win11".to_string();
        records[2].os_type = "l26".to_string();
        records[3].template = true;

        let stats = VmStatistics::from_records(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.running, 2);
        assert_eq!(stats.stopped, 2);
        assert_eq!(stats.templates, 1);
        assert_eq!(stats.running_cores, 6.0);
        assert_eq!(stats.running_memory_gb, 12.0);
        assert_eq!(stats.average_cpu_usage, 20.0);
        assert_eq!(stats.total_disk_gb, 360.0);
        assert_eq!(
            stats.os_distribution,
            vec![("l26".to_string(), 2), ("win11".to_string(), 1)]
        );
    }

    #[test]
    fn test_unknown_os_and_empty_input() {
        let stats = VmStatistics::from_records(&[vm_record(1, "stopped", 1.0, 1.0, 1.0)]);
        assert_eq!(stats.os_distribution, vec![("Unknown".to_string(), 1)]);
        assert_eq!(stats.average_cpu_usage, 0.0);

        assert_eq!(VmStatistics::from_records(&[]), VmStatistics::default());
    }
}
