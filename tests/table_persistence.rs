//! Persistence tests: table state across re-initialization from ROM

use nvparam::core::parameters::{
    ParamError, ParamTable, ParamValue, SyncDirection, SyncTarget, TableConfig, TableTag,
    CELL_SIZE, TABLE_INFO_SIZE,
};
use nvparam::platform::mock::{Fault, MockRom};

type Rom = MockRom<2048>;

fn config(tag: &str) -> TableConfig {
    TableConfig::new(TableTag::new(tag).unwrap())
}

#[test]
fn every_type_survives_reinit() {
    let values = [
        ("U8", ParamValue::U8(0xFE)),
        ("I8", ParamValue::I8(-5)),
        ("U16", ParamValue::U16(0xBEEF)),
        ("I16", ParamValue::I16(-30_000)),
        ("U32", ParamValue::U32(0xDEAD_BEEF)),
        ("I32", ParamValue::I32(i32::MIN)),
        ("U64", ParamValue::U64(u64::MAX)),
        ("I64", ParamValue::I64(-1)),
        ("F32", ParamValue::F32(3.25)),
        ("F64", ParamValue::F64(-1024.5)),
    ];

    let mut ram = [0u8; 1024];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    for (name, value) in values {
        assert_eq!(table.create(name, value), Ok(value));
    }
    let check = table.check_value();
    drop(table);

    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.len(), values.len());
    assert_eq!(table.check_value(), check);
    for (index, (name, value)) in values.iter().enumerate() {
        assert_eq!(table.get(name), Some(*value), "{}", name);
        assert_eq!(table.index_of(name), Some(index as u16));
    }
}

#[test]
fn changes_and_deletes_survive_reinit() {
    let mut ram = [0u8; 512];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("SPEED", ParamValue::F32(2.5)).unwrap();
    table.create("MODE", ParamValue::U8(1)).unwrap();
    table.create("BOOT_CNT", ParamValue::U32(0)).unwrap();
    table.change("BOOT_CNT", ParamValue::U32(7)).unwrap();
    table.delete("SPEED").unwrap();
    drop(table);

    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("SPEED"), None);
    assert_eq!(table.get("MODE"), Some(ParamValue::U8(1)));
    assert_eq!(table.get("BOOT_CNT"), Some(ParamValue::U32(7)));
    assert_eq!(table.name_at(0).unwrap().as_str(), "MODE");
}

#[test]
fn reinit_discards_stale_ram() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("A", ParamValue::U8(1)).unwrap();
    drop(table);

    ram[3 * CELL_SIZE..4 * CELL_SIZE].fill(0x5A);
    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.len(), 1);
    assert!(table.ram()[CELL_SIZE..].iter().all(|&b| b == 0));
}

#[test]
fn erased_rom_is_formatted() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::erased();

    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert!(table.is_empty());
    drop(table);

    assert_eq!(rom.contents(0, 5), b"TEST\0");
    assert_eq!(rom.contents(16, 4), &[0, 0, 0xFF, 0xFF]);
}

#[test]
fn foreign_tag_is_formatted() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("ALPHA"), &mut ram, &mut rom).unwrap();
    table.create("A", ParamValue::U8(1)).unwrap();
    drop(table);

    let table = ParamTable::init(config("BETA"), &mut ram, &mut rom).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.table_tag().as_str(), "BETA");
    drop(table);

    let table = ParamTable::init(config("ALPHA"), &mut ram, &mut rom).unwrap();
    assert!(table.is_empty());
}

#[test]
fn tables_at_different_bases_are_independent() {
    let mut ram_a = [0u8; 4 * CELL_SIZE];
    let mut ram_b = [0u8; 4 * CELL_SIZE];
    let mut rom = Rom::new();
    let base_b = (TABLE_INFO_SIZE + 4 * CELL_SIZE) as u32;

    let mut a = ParamTable::init(config("NAV"), &mut ram_a, &mut rom).unwrap();
    a.create("GAIN", ParamValue::F32(0.5)).unwrap();
    drop(a);

    let mut b = ParamTable::init(config("RADIO").with_rom_base(base_b), &mut ram_b, &mut rom)
        .unwrap();
    b.create("GAIN", ParamValue::U8(3)).unwrap();
    drop(b);

    assert_eq!(rom.contents(base_b, 5), b"RADIO");

    let a = ParamTable::init(config("NAV"), &mut ram_a, &mut rom).unwrap();
    assert_eq!(a.get("GAIN"), Some(ParamValue::F32(0.5)));
    drop(a);

    let b = ParamTable::init(config("RADIO").with_rom_base(base_b), &mut ram_b, &mut rom)
        .unwrap();
    assert_eq!(b.get("GAIN"), Some(ParamValue::U8(3)));
}

#[test]
fn corrupted_cell_is_detected_and_formatted() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("A", ParamValue::U32(1)).unwrap();
    table.create("B", ParamValue::U32(2)).unwrap();
    drop(table);

    // Flip a data byte of cell 1
    rom.inject_corruption((TABLE_INFO_SIZE + CELL_SIZE + 17) as u32, 1);

    let result = ParamTable::init(config("TEST"), &mut ram, &mut rom);
    assert!(matches!(result, Err(ParamError::ChecksumMismatch { .. })));

    let mut table = ParamTable::format(config("TEST"), &mut ram, &mut rom).unwrap();
    assert!(table.is_empty());
    table.create("A", ParamValue::U32(10)).unwrap();
    drop(table);

    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("A"), Some(ParamValue::U32(10)));
}

#[test]
fn torn_create_leaves_previous_table() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("A", ParamValue::U8(1)).unwrap();
    table.create("B", ParamValue::U8(2)).unwrap();

    table.rom_mut().simulate_power_loss();
    let result = table.create("C", ParamValue::U8(3));
    assert!(matches!(
        result,
        Err(ParamError::SyncFailure {
            target: SyncTarget::Cell(2),
            direction: SyncDirection::RamToRom,
            ..
        })
    ));
    drop(table);
    rom.restore_power();

    // Header was never rewritten, so the torn cell is outside the table
    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("C"), None);
    assert_eq!(table.create("C", ParamValue::U8(3)), Ok(ParamValue::U8(3)));
}

#[test]
fn torn_delete_fails_checksum_until_formatted() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    for (i, name) in ["A", "B", "C"].iter().enumerate() {
        table.create(name, ParamValue::U8(i as u8)).unwrap();
    }

    table.rom_mut().set_write_fault(Fault::AfterSuccesses(1));
    assert_eq!(
        table.delete("A"),
        Err(ParamError::SyncFailure {
            target: SyncTarget::Cell(1),
            direction: SyncDirection::RamToRom,
            attempts: 4,
        })
    );
    drop(table);
    rom.set_write_fault(Fault::None);

    // Cell 0 was shifted, cell 1 and the header were not
    let result = ParamTable::init(config("TEST"), &mut ram, &mut rom);
    assert!(matches!(result, Err(ParamError::ChecksumMismatch { .. })));

    let mut table = ParamTable::format(config("TEST"), &mut ram, &mut rom).unwrap();
    assert!(table.is_empty());
    table.create("B", ParamValue::U8(1)).unwrap();
    drop(table);

    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("B"), Some(ParamValue::U8(1)));
}

#[test]
fn change_without_header_fails_checksum() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("GAIN", ParamValue::F32(0.5)).unwrap();

    // Cell write lands, header write fails
    table.rom_mut().set_write_fault(Fault::AfterSuccesses(1));
    assert!(matches!(
        table.change("GAIN", ParamValue::F32(0.75)),
        Err(ParamError::SyncFailure {
            target: SyncTarget::Header,
            ..
        })
    ));
    assert_eq!(table.get("GAIN"), Some(ParamValue::F32(0.75)));
    drop(table);
    rom.set_write_fault(Fault::None);

    let result = ParamTable::init(config("TEST"), &mut ram, &mut rom);
    assert!(matches!(result, Err(ParamError::ChecksumMismatch { .. })));

    let table = ParamTable::format(config("TEST"), &mut ram, &mut rom).unwrap();
    assert!(table.is_empty());
}

#[test]
fn stored_count_larger_than_ram_block() {
    let mut big = [0u8; 4 * CELL_SIZE];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut big, &mut rom).unwrap();
    for name in ["A", "B", "C"] {
        table.create(name, ParamValue::U8(0)).unwrap();
    }
    drop(table);

    let mut small = [0u8; 2 * CELL_SIZE];
    let result = ParamTable::init(config("TEST"), &mut small, &mut rom);
    assert!(matches!(
        result,
        Err(ParamError::AddressOutOfBounds { index: 2 })
    ));
}

#[test]
fn unreadable_rom_fails_init() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();
    rom.set_read_fault(Fault::Always);

    let result = ParamTable::init(config("TEST"), &mut ram, &mut rom);
    assert!(matches!(
        result,
        Err(ParamError::SyncFailure {
            target: SyncTarget::Header,
            direction: SyncDirection::RomToRam,
            attempts: 4,
        })
    ));
    assert_eq!(rom.read_count(), 4);
}

#[test]
fn transient_read_faults_are_retried() {
    let mut ram = [0u8; 256];
    let mut rom = Rom::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("A", ParamValue::I16(-2)).unwrap();
    drop(table);

    rom.set_read_fault(Fault::Next(3));
    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.get("A"), Some(ParamValue::I16(-2)));
}

#[test]
fn rom_smaller_than_table_reports_sync_failure() {
    let mut ram = [0u8; 4 * CELL_SIZE];
    let mut rom = MockRom::<{ TABLE_INFO_SIZE + CELL_SIZE }>::new();

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("A", ParamValue::U8(1)).unwrap();

    assert!(matches!(
        table.create("B", ParamValue::U8(2)),
        Err(ParamError::SyncFailure {
            target: SyncTarget::Cell(1),
            ..
        })
    ));
}

#[test]
fn custom_checksum_is_used_for_verification() {
    fn xor16(data: &[u8]) -> u16 {
        data.chunks(2).fold(0u16, |acc, pair| {
            let word = u16::from_le_bytes([pair[0], *pair.get(1).unwrap_or(&0)]);
            acc ^ word
        })
    }

    let mut ram = [0u8; 256];
    let mut rom = Rom::new().with_checksum(xor16);

    let mut table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    table.create("A", ParamValue::U16(0x1234)).unwrap();
    let expected = xor16(&table.ram()[..CELL_SIZE]);
    assert_eq!(table.check_value(), expected);
    drop(table);

    let header = rom.contents(16, 4).to_vec();
    assert_eq!(header, [1, 0, expected.to_le_bytes()[0], expected.to_le_bytes()[1]]);

    let table = ParamTable::init(config("TEST"), &mut ram, &mut rom).unwrap();
    assert_eq!(table.get("A"), Some(ParamValue::U16(0x1234)));
}
