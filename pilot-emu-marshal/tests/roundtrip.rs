use pilot_emu_marshal::{
    GuestStruct, KernelInfo, SemaphoreInfo, SysKernelInfo, TaskInfo, TimerInfo,
};
use pilot_emu_mem::{GuestAddr, Ram};
use proptest::prelude::*;

fn task_info() -> impl Strategy<Value = TaskInfo> {
    (
        (any::<u32>(), any::<u32>(), any::<u32>(), any::<u16>()),
        (any::<u32>(), any::<u32>(), any::<u16>(), any::<u16>()),
        (any::<u16>(), any::<u32>(), any::<u32>(), any::<u32>()),
        (any::<u32>(), any::<u32>(), any::<u32>()),
    )
        .prop_map(
            |(
                (id, next_id, tag, status),
                (timer, time_slice, priority, attributes),
                (pending_calls, sender_task_id, msg_exchange_id, tcb),
                (stack, stack_start, stack_size),
            )| TaskInfo {
                id,
                next_id,
                tag,
                status,
                timer,
                time_slice,
                priority,
                attributes,
                pending_calls,
                sender_task_id,
                msg_exchange_id,
                tcb_ptr: GuestAddr::new(tcb),
                stack_ptr: GuestAddr::new(stack),
                stack_start: GuestAddr::new(stack_start),
                stack_size,
            },
        )
}

fn semaphore_info() -> impl Strategy<Value = SemaphoreInfo> {
    (
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<u32>(),
    )
        .prop_map(
            |(id, next_id, tag, init_value, cur_value, nest_level, owner_id)| SemaphoreInfo {
                id,
                next_id,
                tag,
                init_value,
                cur_value,
                nest_level,
                owner_id,
            },
        )
}

fn timer_info() -> impl Strategy<Value = TimerInfo> {
    (
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(|(id, next_id, tag, ticks_left, period, proc_addr)| TimerInfo {
            id,
            next_id,
            tag,
            ticks_left,
            period,
            proc_ptr: GuestAddr::new(proc_addr),
        })
}

fn kernel_info() -> impl Strategy<Value = SysKernelInfo> {
    let info = prop_oneof![
        task_info().prop_map(KernelInfo::CurTask),
        task_info().prop_map(KernelInfo::Task),
        semaphore_info().prop_map(KernelInfo::Semaphore),
        timer_info().prop_map(KernelInfo::Timer),
    ];

    (any::<u8>(), any::<u16>(), info).prop_map(|(reserved, id, info)| SysKernelInfo {
        reserved,
        id,
        info,
    })
}

proptest! {
    // Round-trip law: write then read reproduces the structure field for
    // field, for every valid selector.
    #[test]
    fn kernel_info_round_trips(info in kernel_info()) {
        let mem = Ram::new(GuestAddr::new(0x1000), 0x100);
        let at = GuestAddr::new(0x1010);

        info.write_guest(&mem, at).unwrap();
        let back = SysKernelInfo::read_guest(&mem, at).unwrap();

        prop_assert_eq!(back, info);
    }
}
