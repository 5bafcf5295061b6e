use crate::adapters::{CloudClient, CloudResult, NicSpec};
use crate::policy::Policy;
use crate::types::Action;

/// Issue one action against the provider.
///
/// Returns the provider's identifier for anything the call created.
pub(crate) fn invoke(
    cloud: &dyn CloudClient,
    policy: &Policy,
    action: &Action,
) -> CloudResult<Option<String>> {
    match action {
        Action::CreateNic {
            name,
            resource_group,
            location,
            subnet_id,
            address,
        } => cloud
            .create_nic(&NicSpec {
                name,
                resource_group,
                location,
                subnet_id,
                address: *address,
            })
            .map(Some),
        Action::DeleteNic {
            name,
            resource_group,
        } => cloud.delete_nic(name, resource_group).map(|()| None),
        Action::DeallocateVm { resource_group, vm } => {
            cloud.deallocate_vm(resource_group, vm).map(|()| None)
        }
        Action::StartVm { resource_group, vm } => cloud
            .start_vm(resource_group, vm, policy.start.blocks())
            .map(|()| None),
        Action::AttachNic {
            nic,
            resource_group,
            vm,
        } => cloud.attach_nic(nic, resource_group, vm).map(|()| None),
        Action::DetachNic {
            nic,
            resource_group,
            vm,
        } => cloud.detach_nic(nic, resource_group, vm).map(|()| None),
    }
}
