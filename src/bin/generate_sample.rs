use serde_json::{json, Value};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (name, vCPU, RAM GiB, USD per vCPU-day)
const MACHINE_TYPES: [(&str, u32, u32, f64); 5] = [
    ("e2-small", 2, 2, 0.40),
    ("e2-standard-4", 4, 16, 0.64),
    ("n1-standard-8", 8, 30, 0.91),
    ("n2-highmem-16", 16, 128, 1.10),
    ("c2-standard-30", 30, 120, 1.25),
];

fn main() {
    let mut rng = SimpleRng::new(42);

    let projects = [
        ("billing-prod", "Priya"),
        ("billing-dev", "Priya"),
        ("search", "Arjun"),
        ("analytics", "Meera"),
        ("platform", "Arjun"),
    ];
    let types = ["web", "db", "batch", "cache"];
    let zones = ["asia-south1-a", "asia-south1-b", "us-central1-a"];

    let mut vms: Vec<Value> = Vec::new();
    for (p, &(project, hod)) in projects.iter().enumerate() {
        for i in 0..8 {
            let vm_type = *rng.pick(&types);
            let &(machine, vcpu, ram, rate) = rng.pick(&MACHINE_TYPES);
            let jitter = 0.9 + rng.next_f64() * 0.2;
            let daily_cost = format!("{:.2}", vcpu as f64 * rate * jitter);

            // A few dirty rows, as real exports have them.
            let daily_cost = if (p * 8 + i) % 17 == 16 {
                Value::String("n/a".to_string())
            } else {
                Value::String(daily_cost)
            };

            vms.push(json!({
                "Project_Name": project,
                "Type": vm_type,
                "Machine_Type": machine,
                "HOD": hod,
                "Instance_Name": format!("{project}-{vm_type}-{i:02}"),
                "vCPU": vcpu.to_string(),
                "RAM": ram,
                "Daily_Cost": daily_cost,
                "labels": {
                    "zone": *rng.pick(&zones),
                    "env": if project.ends_with("-dev") { "dev" } else { "prod" },
                },
            }));
        }
    }

    let output_path = "gcp_inventory.json";
    let text = serde_json::to_string_pretty(&Value::Array(vms)).expect("Failed to serialize inventory");
    std::fs::write(output_path, text).expect("Failed to write output file");

    println!("Wrote {} VMs to {output_path}", projects.len() * 8);
}
