//! The sync-session scenario: a desktop-link command block is built in a
//! host buffer, projected into guest space for the session's lifetime, and
//! handed to the guest through the session block's command pointer.

use pilot_emu::{Machine, MachineConfig};
use pilot_emu_hal::Ez328Bank;
use pilot_emu_marshal::{DlkServerSession, DlpReqHeader, DlpTinyArgWrapper, GuestStruct};
use pilot_emu_mem::{GuestAddr, MemAccess, ScopedMapping};

const DLP_WRITE_USER_INFO: u8 = 0x11;
const ARG_ID_USER_NAME: u8 = 0x20;

const SESSION_AT: GuestAddr = GuestAddr::new(0x3000);

#[test]
fn command_block_is_visible_only_while_mapped() {
    let machine = Machine::new(MachineConfig::default(), Box::new(Ez328Bank::new()));
    let mem = machine.mem();

    let user_name = b"Pilot User";
    let mut block = vec![0u8; DlpReqHeader::SIZE as usize
        + DlpTinyArgWrapper::SIZE as usize
        + user_name.len()];

    let cmd_addr;
    {
        let mapping = ScopedMapping::new(mem.mapped(), Some(&mut block)).unwrap();
        cmd_addr = mapping.guest_addr();
        assert!(!cmd_addr.is_null());

        // Fill the block in place through the bus, exactly as the session
        // layer does before handing the command to the guest.
        DlpReqHeader {
            id: DLP_WRITE_USER_INFO,
            argc: 1,
        }
        .write_guest(mem, cmd_addr)
        .unwrap();

        DlpTinyArgWrapper {
            b_id: ARG_ID_USER_NAME,
            b_size: user_name.len() as u8,
        }
        .write_guest(mem, cmd_addr.offset(DlpReqHeader::SIZE as i32))
        .unwrap();

        mem.write(
            cmd_addr.offset((DlpReqHeader::SIZE + DlpTinyArgWrapper::SIZE) as i32),
            user_name,
        )
        .unwrap();

        let session = DlkServerSession {
            got_command: true,
            cmd_len: block_len(user_name),
            cmd_ptr: cmd_addr,
            ..DlkServerSession::default()
        };
        session.write_guest(mem, SESSION_AT).unwrap();

        // The guest side follows the session's command pointer.
        let seen = DlkServerSession::read_guest(mem, SESSION_AT).unwrap();
        assert!(seen.got_command);

        let header = DlpReqHeader::read_guest(mem, seen.cmd_ptr).unwrap();
        assert_eq!(header.id, DLP_WRITE_USER_INFO);
        assert_eq!(header.argc, 1);

        let mut name = vec![0u8; user_name.len()];
        mem.read(
            seen.cmd_ptr
                .offset((DlpReqHeader::SIZE + DlpTinyArgWrapper::SIZE) as i32),
            &mut name,
        )
        .unwrap();
        assert_eq!(name, user_name);
    }

    // The mapping ended with its scope: guest writes landed back in the
    // host buffer and the projection address no longer resolves.
    assert_eq!(block[0], DLP_WRITE_USER_INFO);
    assert_eq!(block[2], ARG_ID_USER_NAME);
    assert_eq!(&block[4..4 + user_name.len()], user_name);

    let mut byte = [0u8; 1];
    assert!(machine.mem().read(cmd_addr, &mut byte).is_err());
}

#[test]
fn session_with_no_host_block_maps_nothing() {
    let machine = Machine::new(MachineConfig::default(), Box::new(Ez328Bank::new()));
    let mem = machine.mem();

    let mapping = ScopedMapping::new(mem.mapped(), None).unwrap();
    assert!(mapping.guest_addr().is_null());
    assert_eq!(mem.mapped().live_mappings(), 0);
}

fn block_len(name: &[u8]) -> u32 {
    DlpReqHeader::SIZE + DlpTinyArgWrapper::SIZE + name.len() as u32
}
