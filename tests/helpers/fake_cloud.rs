//! In-memory stand-in for the cloud provider.
//!
//! Keeps a tiny model of NICs and VM power state so tests can assert where
//! each address ended up, records every call in order, and fails calls on
//! request.
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use nicswap::adapters::{CloudClient, CloudError, CloudResult, NicSpec};
use nicswap::types::Action;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub op: String,
    pub args: Vec<String>,
}

impl Call {
    fn new(op: &str, args: &[&str]) -> Self {
        Self {
            op: op.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self.op.as_str(),
            "create_nic" | "delete_nic" | "deallocate_vm" | "start_vm" | "attach_nic" | "detach_nic"
        )
    }
}

impl From<&Action> for Call {
    fn from(a: &Action) -> Self {
        Self {
            op: a.kind().to_string(),
            args: a.params(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FakeNic {
    pub name: String,
    pub address: Ipv4Addr,
    pub vm: Option<String>,
    pub resource_group: String,
    pub region: String,
    pub subnet_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Power {
    Running,
    Deallocated,
}

#[derive(Default)]
struct State {
    nics: Vec<FakeNic>,
    power: BTreeMap<String, Power>,
    calls: Vec<Call>,
    /// 1-based ordinals of mutating calls (since the last `clear_calls`) that fail.
    fail_mutations: Vec<usize>,
    fail_ops: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeCloud {
    state: Arc<Mutex<State>>,
}

impl FakeCloud {
    /// ZCA VM `zca-vm` at 10.0.0.4 and appliance VM `zvm-vm` at 10.0.0.5,
    /// both running, same group, region and subnet.
    pub fn zerto_pair() -> Self {
        Self::with_groups("rg-zerto", "rg-zerto")
    }

    pub fn with_groups(zca_rg: &str, zvm_rg: &str) -> Self {
        let fake = Self::default();
        fake.add_vm("zca-vm", "zca-nic", "10.0.0.4", zca_rg, "westeurope", "/subnets/default");
        fake.add_vm("zvm-vm", "zvm-nic", "10.0.0.5", zvm_rg, "westeurope", "/subnets/default");
        fake
    }

    pub fn add_vm(&self, vm: &str, nic: &str, address: &str, rg: &str, region: &str, subnet: &str) {
        let mut st = self.state.lock().unwrap();
        st.nics.push(FakeNic {
            name: nic.into(),
            address: address.parse().unwrap(),
            vm: Some(vm.into()),
            resource_group: rg.into(),
            region: region.into(),
            subnet_id: subnet.into(),
        });
        st.power.insert(vm.into(), Power::Running);
    }

    /// Add a NIC that no VM uses.
    pub fn add_orphan_nic(&self, nic: &str, address: &str) {
        let mut st = self.state.lock().unwrap();
        st.nics.push(FakeNic {
            name: nic.into(),
            address: address.parse().unwrap(),
            vm: None,
            resource_group: "rg-zerto".into(),
            region: "westeurope".into(),
            subnet_id: "/subnets/default".into(),
        });
    }

    pub fn set_nic(&self, nic: &str, f: impl FnOnce(&mut FakeNic)) {
        let mut st = self.state.lock().unwrap();
        if let Some(n) = st.nics.iter_mut().find(|n| n.name == nic) {
            f(n);
        }
    }

    /// Fail the `n`th mutating call (1-based, counted since the last `clear_calls`).
    pub fn fail_mutation(&self, n: usize) -> &Self {
        self.state.lock().unwrap().fail_mutations.push(n);
        self
    }

    /// Fail every call of operation `op`.
    pub fn fail_op(&self, op: &str) -> &Self {
        self.state.lock().unwrap().fail_ops.push(op.into());
        self
    }

    pub fn clear_calls(&self) {
        let mut st = self.state.lock().unwrap();
        st.calls.clear();
        st.fail_mutations.clear();
        st.fail_ops.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    /// VM whose NIC holds `address`, if any NIC does and it is attached.
    pub fn vm_holding(&self, address: &str) -> Option<String> {
        let addr: Ipv4Addr = address.parse().unwrap();
        let st = self.state.lock().unwrap();
        st.nics
            .iter()
            .find(|n| n.address == addr)
            .and_then(|n| n.vm.clone())
    }

    pub fn nic_exists_at(&self, address: &str) -> bool {
        let addr: Ipv4Addr = address.parse().unwrap();
        self.state
            .lock()
            .unwrap()
            .nics
            .iter()
            .any(|n| n.address == addr)
    }

    pub fn power(&self, vm: &str) -> Option<Power> {
        self.state.lock().unwrap().power.get(vm).copied()
    }

    fn record(&self, op: &'static str, args: &[&str]) -> CloudResult<()> {
        let mut st = self.state.lock().unwrap();
        let call = Call::new(op, args);
        let mutating = call.is_mutating();
        st.calls.push(call);
        if st.fail_ops.iter().any(|o| o == op) {
            return Err(CloudError::new(op, "injected failure"));
        }
        if mutating {
            let ordinal = st.calls.iter().filter(|c| c.is_mutating()).count();
            if st.fail_mutations.contains(&ordinal) {
                return Err(CloudError::new(op, "injected failure"));
            }
        }
        Ok(())
    }

    fn nic_at(&self, op: &'static str, address: Ipv4Addr) -> CloudResult<FakeNic> {
        self.state
            .lock()
            .unwrap()
            .nics
            .iter()
            .find(|n| n.address == address)
            .cloned()
            .ok_or_else(|| CloudError::new(op, format!("no NIC holds {address}")))
    }

    fn stopped(&self, op: &'static str, vm: &str) -> CloudResult<()> {
        match self.power(vm) {
            Some(Power::Deallocated) => Ok(()),
            Some(Power::Running) => Err(CloudError::new(op, format!("VM '{vm}' is running"))),
            None => Err(CloudError::new(op, format!("VM '{vm}' not found"))),
        }
    }
}

impl CloudClient for FakeCloud {
    fn vm_by_address(&self, address: Ipv4Addr) -> CloudResult<String> {
        self.record("vm_by_address", &[address.to_string().as_str()])?;
        self.nic_at("vm_by_address", address)?
            .vm
            .ok_or_else(|| {
                CloudError::new("vm_by_address", format!("NIC holding {address} is not attached"))
            })
    }

    fn nic_by_address(&self, address: Ipv4Addr) -> CloudResult<Option<String>> {
        self.record("nic_by_address", &[address.to_string().as_str()])?;
        Ok(self.nic_at("nic_by_address", address).ok().map(|n| n.name))
    }

    fn resource_group_by_address(&self, address: Ipv4Addr) -> CloudResult<String> {
        self.record("resource_group_by_address", &[address.to_string().as_str()])?;
        Ok(self.nic_at("resource_group_by_address", address)?.resource_group)
    }

    fn region_by_address(&self, address: Ipv4Addr) -> CloudResult<String> {
        self.record("region_by_address", &[address.to_string().as_str()])?;
        Ok(self.nic_at("region_by_address", address)?.region)
    }

    fn subnet_of_nic(&self, nic: &str, resource_group: &str) -> CloudResult<String> {
        self.record("subnet_of_nic", &[nic, resource_group])?;
        self.state
            .lock()
            .unwrap()
            .nics
            .iter()
            .find(|n| n.name == nic)
            .map(|n| n.subnet_id.clone())
            .ok_or_else(|| CloudError::new("subnet_of_nic", format!("NIC '{nic}' not found")))
    }

    fn create_nic(&self, spec: &NicSpec<'_>) -> CloudResult<String> {
        let address = spec.address.to_string();
        self.record(
            "create_nic",
            &[spec.name, spec.resource_group, spec.location, spec.subnet_id, address.as_str()],
        )?;
        let mut st = self.state.lock().unwrap();
        if st.nics.iter().any(|n| n.name == spec.name || n.address == spec.address) {
            return Err(CloudError::new("create_nic", "NIC name or address already taken"));
        }
        st.nics.push(FakeNic {
            name: spec.name.into(),
            address: spec.address,
            vm: None,
            resource_group: spec.resource_group.into(),
            region: spec.location.into(),
            subnet_id: spec.subnet_id.into(),
        });
        Ok(format!("/subscriptions/fake/networkInterfaces/{}", spec.name))
    }

    fn delete_nic(&self, name: &str, resource_group: &str) -> CloudResult<()> {
        self.record("delete_nic", &[name, resource_group])?;
        let mut st = self.state.lock().unwrap();
        match st.nics.iter().position(|n| n.name == name) {
            Some(i) if st.nics[i].vm.is_some() => {
                Err(CloudError::new("delete_nic", format!("NIC '{name}' is in use")))
            }
            Some(i) => {
                st.nics.remove(i);
                Ok(())
            }
            None => Err(CloudError::new("delete_nic", format!("NIC '{name}' not found"))),
        }
    }

    fn deallocate_vm(&self, resource_group: &str, vm: &str) -> CloudResult<()> {
        self.record("deallocate_vm", &[resource_group, vm])?;
        let mut st = self.state.lock().unwrap();
        match st.power.get_mut(vm) {
            Some(p) => {
                *p = Power::Deallocated;
                Ok(())
            }
            None => Err(CloudError::new("deallocate_vm", format!("VM '{vm}' not found"))),
        }
    }

    fn start_vm(&self, resource_group: &str, vm: &str, _wait: bool) -> CloudResult<()> {
        self.record("start_vm", &[resource_group, vm])?;
        let mut st = self.state.lock().unwrap();
        match st.power.get_mut(vm) {
            Some(p) => {
                *p = Power::Running;
                Ok(())
            }
            None => Err(CloudError::new("start_vm", format!("VM '{vm}' not found"))),
        }
    }

    fn attach_nic(&self, nic: &str, resource_group: &str, vm: &str) -> CloudResult<()> {
        self.record("attach_nic", &[nic, resource_group, vm])?;
        self.stopped("attach_nic", vm)?;
        let mut st = self.state.lock().unwrap();
        match st.nics.iter_mut().find(|n| n.name == nic) {
            Some(n) if n.vm.is_none() => {
                n.vm = Some(vm.into());
                Ok(())
            }
            Some(_) => Err(CloudError::new("attach_nic", format!("NIC '{nic}' is in use"))),
            None => Err(CloudError::new("attach_nic", format!("NIC '{nic}' not found"))),
        }
    }

    fn detach_nic(&self, nic: &str, resource_group: &str, vm: &str) -> CloudResult<()> {
        self.record("detach_nic", &[nic, resource_group, vm])?;
        self.stopped("detach_nic", vm)?;
        let mut st = self.state.lock().unwrap();
        match st.nics.iter_mut().find(|n| n.name == nic) {
            Some(n) if n.vm.as_deref() == Some(vm) => {
                n.vm = None;
                Ok(())
            }
            _ => Err(CloudError::new(
                "detach_nic",
                format!("NIC '{nic}' is not attached to '{vm}'"),
            )),
        }
    }
}
