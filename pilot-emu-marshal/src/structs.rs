//! The guest structures the bridge marshals.
//!
//! Fixed layouts go through [`guest_struct!`]; the kernel-info structure is
//! hand-written because its payload is selected by a discriminant and only
//! the fields registered for the active selector may be touched.

use pilot_emu_errors::{EmuError, EmuResult};
use pilot_emu_mem::{GuestAddr, MemAccess};
use pilot_emu_primitives::primitive::{be_fake_enum, BeU8};

use crate::guest_struct;
use crate::layout::{FieldDescriptor, FieldWidth, GuestField, GuestStruct};

guest_struct! {
    /// A point on the guest's screen.
    pub struct Point : 4 {
        pub x: i16 = 0,
        pub y: i16 = 2,
    }
}

guest_struct! {
    /// Kernel task descriptor, the payload for the task-info selectors.
    ///
    /// The guest packs these on 16-bit boundaries, so several 32-bit fields
    /// sit at unaligned offsets; field-by-field marshalling is what makes
    /// that a non-issue.
    pub struct TaskInfo : 52 {
        pub id: u32 = 0,
        pub next_id: u32 = 4,
        pub tag: u32 = 8,
        pub status: u16 = 12,
        pub timer: u32 = 14,
        pub time_slice: u32 = 18,
        pub priority: u16 = 22,
        pub attributes: u16 = 24,
        pub pending_calls: u16 = 26,
        pub sender_task_id: u32 = 28,
        pub msg_exchange_id: u32 = 32,
        pub tcb_ptr: GuestAddr = 36,
        pub stack_ptr: GuestAddr = 40,
        pub stack_start: GuestAddr = 44,
        pub stack_size: u32 = 48,
    }
}

guest_struct! {
    /// Kernel semaphore descriptor payload.
    pub struct SemaphoreInfo : 22 {
        pub id: u32 = 0,
        pub next_id: u32 = 4,
        pub tag: u32 = 8,
        pub init_value: u16 = 12,
        pub cur_value: u16 = 14,
        pub nest_level: u16 = 16,
        pub owner_id: u32 = 18,
    }
}

guest_struct! {
    /// Kernel timer descriptor payload.
    pub struct TimerInfo : 24 {
        pub id: u32 = 0,
        pub next_id: u32 = 4,
        pub tag: u32 = 8,
        pub ticks_left: u32 = 12,
        pub period: u32 = 16,
        pub proc_ptr: GuestAddr = 20,
    }
}

/// The selector-dependent payload of [`SysKernelInfo`].
///
/// The selector is fully encoded in the variant, so an impossible
/// tag/payload combination is unrepresentable and a `match` over the
/// payload is checked for exhaustiveness by the compiler.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KernelInfo {
    /// Selector 0: the currently scheduled task.
    CurTask(TaskInfo),
    /// Selector 1: a task identified by `SysKernelInfo::id`.
    Task(TaskInfo),
    /// Selector 2: a semaphore.
    Semaphore(SemaphoreInfo),
    /// Selector 3: a timer.
    Timer(TimerInfo),
}

impl KernelInfo {
    pub const SEL_CUR_TASK: u8 = 0;
    pub const SEL_TASK: u8 = 1;
    pub const SEL_SEMAPHORE: u8 = 2;
    pub const SEL_TIMER: u8 = 3;

    /// The wire value of the selector byte for this payload.
    pub const fn selector(&self) -> u8 {
        match self {
            Self::CurTask(_) => Self::SEL_CUR_TASK,
            Self::Task(_) => Self::SEL_TASK,
            Self::Semaphore(_) => Self::SEL_SEMAPHORE,
            Self::Timer(_) => Self::SEL_TIMER,
        }
    }
}

impl Default for KernelInfo {
    fn default() -> Self {
        Self::CurTask(TaskInfo::default())
    }
}

/// The kernel-information structure handed to the OS info syscall.
///
/// Header fields are common to every selector; the payload at
/// [`Self::OFFSET_PARAM`] is valid only as interpreted by the selector, and
/// marshalling never reads or writes payload bytes outside the active
/// selector's field set.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SysKernelInfo {
    pub reserved: u8,
    pub id: u16,
    pub info: KernelInfo,
}

impl SysKernelInfo {
    pub const OFFSET_SELECTOR: u32 = 0;
    pub const OFFSET_RESERVED: u32 = 1;
    pub const OFFSET_ID: u32 = 2;
    pub const OFFSET_PARAM: u32 = 4;
}

impl GuestStruct for SysKernelInfo {
    const NAME: &'static str = "SysKernelInfo";
    const SIZE: u32 = Self::OFFSET_PARAM + TaskInfo::SIZE;
    const FIELDS: &'static [FieldDescriptor] = &[
        FieldDescriptor {
            name: "selector",
            offset: Self::OFFSET_SELECTOR,
            width: FieldWidth::U8,
        },
        FieldDescriptor {
            name: "reserved",
            offset: Self::OFFSET_RESERVED,
            width: FieldWidth::U8,
        },
        FieldDescriptor {
            name: "id",
            offset: Self::OFFSET_ID,
            width: FieldWidth::U16,
        },
        FieldDescriptor {
            name: "param",
            offset: Self::OFFSET_PARAM,
            width: FieldWidth::Aggregate(TaskInfo::SIZE),
        },
    ];

    fn read_fields<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self> {
        let selector = mem.get_u8(addr.offset(Self::OFFSET_SELECTOR as i32))?;
        let reserved = mem.get_u8(addr.offset(Self::OFFSET_RESERVED as i32))?;
        let id = mem.get_u16(addr.offset(Self::OFFSET_ID as i32))?;

        let param = addr.offset(Self::OFFSET_PARAM as i32);
        let info = match selector {
            KernelInfo::SEL_CUR_TASK => KernelInfo::CurTask(TaskInfo::read_fields(mem, param)?),
            KernelInfo::SEL_TASK => KernelInfo::Task(TaskInfo::read_fields(mem, param)?),
            KernelInfo::SEL_SEMAPHORE => {
                KernelInfo::Semaphore(SemaphoreInfo::read_fields(mem, param)?)
            }
            KernelInfo::SEL_TIMER => KernelInfo::Timer(TimerInfo::read_fields(mem, param)?),
            selector => {
                return Err(EmuError::UnknownSelector {
                    layout: Self::NAME,
                    selector,
                })
            }
        };

        Ok(Self { reserved, id, info })
    }

    fn write_fields<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()> {
        mem.put_u8(addr.offset(Self::OFFSET_SELECTOR as i32), self.info.selector())?;
        mem.put_u8(addr.offset(Self::OFFSET_RESERVED as i32), self.reserved)?;
        mem.put_u16(addr.offset(Self::OFFSET_ID as i32), self.id)?;

        let param = addr.offset(Self::OFFSET_PARAM as i32);
        match &self.info {
            KernelInfo::CurTask(task) | KernelInfo::Task(task) => task.write_fields(mem, param),
            KernelInfo::Semaphore(sem) => sem.write_fields(mem, param),
            KernelInfo::Timer(timer) => timer.write_fields(mem, param),
        }
    }
}

be_fake_enum! {
    #[repr(pub(crate) BeU8)]
    /// Progress of a desktop-link sync session, as the guest stores it.
    ///
    /// Newer OS versions store values we do not know about; those round-trip
    /// untouched and fail `validate`.
    #[derive(Default)]
    pub enum SyncState {
        Idle = 0,
        Connecting = 1,
        Syncing = 2,
        Ending = 3,
    }
}

impl GuestField for SyncState {
    const WIDTH: FieldWidth = FieldWidth::U8;

    fn read_field<M: MemAccess>(mem: &M, addr: GuestAddr) -> EmuResult<Self> {
        Ok(Self(BeU8::new(mem.get_u8(addr)?)))
    }

    fn write_field<M: MemAccess>(&self, mem: &M, addr: GuestAddr) -> EmuResult<()> {
        mem.put_u8(addr, self.0.get())
    }
}

guest_struct! {
    /// Desktop-link server session block.
    ///
    /// Trimmed to the fields the bridge itself exercises; the command block
    /// pointed to by `cmd_ptr` is typically a host buffer projected through
    /// the scoped mapper.
    pub struct DlkServerSession : 46 {
        pub htal_lib_ref_num: u16 = 0,
        pub max_htal_xfer_size: u32 = 2,
        pub event_proc_ptr: GuestAddr = 6,
        pub can_proc_ptr: GuestAddr = 10,
        pub dlk_db_id: u32 = 14,
        pub card_no: u16 = 18,
        pub db_creator: u32 = 20,
        pub sync_state: SyncState = 24,
        pub complete: bool = 25,
        pub conduit_opened: bool = 26,
        pub log_cleared: bool = 27,
        pub reset_pending: bool = 28,
        pub got_command: bool = 29,
        pub cmd_tid: u8 = 30,
        pub reserved2: u8 = 31,
        pub cmd_len: u32 = 32,
        pub cmd_ptr: GuestAddr = 36,
        pub cmd_handle: GuestAddr = 40,
        pub state_flags: u16 = 44,
    }
}

guest_struct! {
    /// One entry of the guest's system library table.
    pub struct SysLibTblEntry : 16 {
        pub dispatch_tbl_ptr: GuestAddr = 0,
        pub globals_ptr: GuestAddr = 4,
        pub db_id: u32 = 8,
        pub code_rsc_handle: GuestAddr = 12,
    }
}

guest_struct! {
    /// Desktop-link request header, the first bytes of a command block.
    pub struct DlpReqHeader : 2 {
        pub id: u8 = 0,
        pub argc: u8 = 1,
    }
}

guest_struct! {
    /// Wrapper for a small desktop-link request argument.
    pub struct DlpTinyArgWrapper : 2 {
        pub b_id: u8 = 0,
        pub b_size: u8 = 1,
    }
}
