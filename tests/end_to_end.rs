//! Integration tests covering the concrete end-to-end scenarios from
//! spec.md's testable-properties section: a long-filename AR archive, a
//! class-32 crtbegin-like ELF object with REL relocations, a class-64
//! equivalent with RELA relocations, and thin-archive rejection.
//!
//! Cross-unit resolution (the fifth scenario) is exercised directly
//! against [`nacl_ld::link`] in that module's own unit tests, since it
//! needs to construct symbol tables at specific entry indices that the
//! crate intentionally keeps non-public construction for.

use nacl_ld::ar::ArFile;
use nacl_ld::cursor::Endian;
use nacl_ld::elf::consts::{EM_386, EM_X86_64, ET_REL, R_386_PC32, R_X86_64_32S, R_X86_64_PC32, SHT_REL, SHT_RELA, SHT_STRTAB, SHT_SYMTAB};
use nacl_ld::elf::{ElfClass, ElfFile};
use nacl_ld::error::Error;
use nacl_ld::sniff::{sniff, FileType};

fn push_name(table: &mut Vec<u8>, name: &str) -> u32 {
    let offset = table.len() as u32;
    table.extend(name.as_bytes());
    table.push(0);
    offset
}

fn ar_header(name: &str, size: usize) -> Vec<u8> {
    let mut h = vec![b' '; 60];
    let bytes = name.as_bytes();
    h[0..bytes.len()].copy_from_slice(bytes);
    let size_str = size.to_string();
    h[48..48 + size_str.len()].copy_from_slice(size_str.as_bytes());
    h[58] = b'`';
    h[59] = b'\n';
    h
}

fn push_ar_member(blob: &mut Vec<u8>, name: &str, body: &[u8]) {
    blob.extend(ar_header(name, body.len()));
    blob.extend(body);
    if blob.len() % 2 != 0 {
        blob.push(b'\n');
    }
}

/// Scenario 1: a long-filename archive containing five members, two of
/// them referenced through the GNU `//` long-filename table.
#[test]
fn long_filename_archive_yields_exactly_five_members() {
    let long_names = b"file_quick_brown_fox_jumped.txt/\nfile with space in it.txt/\n";

    let mut blob = Vec::new();
    blob.extend(b"!<arch>\n");
    push_ar_member(&mut blob, "//", long_names);
    push_ar_member(&mut blob, "file_11.txt/", b"0123456789\n");
    push_ar_member(&mut blob, "file_24.txt/", b"55555\n55555\n55555\n55555\n");
    push_ar_member(&mut blob, "file_nil.txt/", b"");
    push_ar_member(
        &mut blob,
        "/0",
        b"the quick brown fox jumps over the lazy dog\n",
    );
    push_ar_member(&mut blob, "/34", b"This file has a space in its name.\n");

    let ar = ArFile::decode(&blob, Some("libtest.a")).expect("archive decodes");

    assert_eq!(ar.len(), 5);
    assert!(ar.get("/").is_none());
    assert!(ar.get("//").is_none());

    assert_eq!(ar.get("file_11.txt").unwrap().body, b"0123456789\n");
    assert_eq!(
        ar.get("file_24.txt").unwrap().body,
        b"55555\n55555\n55555\n55555\n"
    );
    assert_eq!(ar.get("file_nil.txt").unwrap().body, b"" as &[u8]);
    assert_eq!(
        ar.get("file_quick_brown_fox_jumped.txt").unwrap().body,
        b"the quick brown fox jumps over the lazy dog\n"
    );
    assert_eq!(
        ar.get("file with space in it.txt").unwrap().body,
        b"This file has a space in its name.\n"
    );

    for (name, member) in ar.members() {
        assert_eq!(member.header.file_size as usize, member.body.len());
        assert_ne!(name, "/");
        assert_ne!(name, "//");
    }
}

/// Builds a class-32, little-endian, `ET_REL`/`EM_386` object with a
/// `.text`, a `.rel.text` with the two entries from spec.md scenario 3,
/// and a `.symtab` whose entries 15 and 16 are the undefined imports and
/// entry 17 is the lone defined export, mirroring a `crtbegin.o`-shaped
/// relocatable object.
fn crtbegin_like_class32() -> Vec<u8> {
    const EHSIZE: usize = 52;
    const SHENTSIZE: usize = 40;

    // entries 1..=14 are anonymous local padding so the two undefined
    // imports land at indices 0x0f and 0x10 exactly as spec.md states.
    let mut strtab = vec![0u8];
    let init_irt_name = push_name(&mut strtab, "__pnacl_init_irt");
    let wrapper_start_name = push_name(&mut strtab, "_pnacl_wrapper_start");
    let pnacl_start_name = push_name(&mut strtab, "__pnacl_start");

    let mut symtab = Vec::new();
    let push_entry = |symtab: &mut Vec<u8>, name_index: u32, value: u32, info: u8, shndx: u16| {
        symtab.extend(name_index.to_le_bytes());
        symtab.extend(value.to_le_bytes());
        symtab.extend(0u32.to_le_bytes()); // size
        symtab.push(info);
        symtab.push(0); // other
        symtab.extend(shndx.to_le_bytes());
    };
    push_entry(&mut symtab, 0, 0, 0, 0); // entry 0: null
    for _ in 1..=14 {
        push_entry(&mut symtab, 0, 0, 0x00, 0); // local, undefined, anonymous
    }
    push_entry(&mut symtab, init_irt_name, 0, 0x10, 0); // entry 15: GLOBAL NOTYPE, SHN_UNDEF
    push_entry(&mut symtab, wrapper_start_name, 0, 0x10, 0); // entry 16
    push_entry(&mut symtab, pnacl_start_name, 0, 0x12, 1); // entry 17: GLOBAL FUNC, shndx=.text

    assert_eq!(symtab.len() / 16, 18);

    let mut rel_text = Vec::new();
    rel_text.extend(0x00bcu32.to_le_bytes());
    rel_text.extend(0x0f02u32.to_le_bytes());
    rel_text.extend(0x00c4u32.to_le_bytes());
    rel_text.extend(0x1002u32.to_le_bytes());

    let shstrtab = b"\0.text\0.rel.text\0.symtab\0.strtab\0.shstrtab\0";
    let text_name = 1u32;
    let rel_text_name = 7u32;
    let symtab_name = 17u32;
    let strtab_name = 25u32;
    let shstrtab_name = 33u32;

    let rel_text_off = EHSIZE;
    let symtab_off = rel_text_off + rel_text.len();
    let strtab_off = symtab_off + symtab.len();
    let shstrtab_off = strtab_off + strtab.len();
    let shnum = 6usize;
    let sh_table_off = shstrtab_off + shstrtab.len();

    let mut blob = vec![0u8; EHSIZE];
    blob[0..4].copy_from_slice(b"\x7fELF");
    blob[4] = 1; // class32
    blob[5] = 1; // LSB
    blob[6] = 1; // EI_VERSION
    blob[16..18].copy_from_slice(&ET_REL.to_le_bytes());
    blob[18..20].copy_from_slice(&EM_386.to_le_bytes());
    blob[20..24].copy_from_slice(&1u32.to_le_bytes());
    blob[32..36].copy_from_slice(&(sh_table_off as u32).to_le_bytes()); // shoff
    blob[40..42].copy_from_slice(&(EHSIZE as u16).to_le_bytes()); // ehsize
    blob[44..46].copy_from_slice(&0u16.to_le_bytes()); // phnum
    blob[46..48].copy_from_slice(&(SHENTSIZE as u16).to_le_bytes());
    blob[48..50].copy_from_slice(&(shnum as u16).to_le_bytes());
    blob[50..52].copy_from_slice(&5u16.to_le_bytes()); // shstrndx

    blob.extend(&rel_text);
    blob.extend(&symtab);
    blob.extend(&strtab);
    blob.extend(shstrtab);

    let section = |name_idx: u32, sh_type: u32, offset: u32, size: u32, link: u32| {
        let mut h = vec![0u8; SHENTSIZE];
        h[0..4].copy_from_slice(&name_idx.to_le_bytes());
        h[4..8].copy_from_slice(&sh_type.to_le_bytes());
        h[16..20].copy_from_slice(&offset.to_le_bytes());
        h[20..24].copy_from_slice(&size.to_le_bytes());
        h[24..28].copy_from_slice(&link.to_le_bytes());
        h
    };

    blob.extend(section(0, 0, 0, 0, 0)); // null
    blob.extend(section(text_name, 1, 0, 0, 0)); // .text PROGBITS, empty
    blob.extend(section(rel_text_name, SHT_REL, rel_text_off as u32, rel_text.len() as u32, 3)); // link -> .symtab
    blob.extend(section(symtab_name, SHT_SYMTAB, symtab_off as u32, symtab.len() as u32, 4)); // link -> .strtab
    blob.extend(section(strtab_name, SHT_STRTAB, strtab_off as u32, strtab.len() as u32, 0));
    blob.extend(section(shstrtab_name, SHT_STRTAB, shstrtab_off as u32, shstrtab.len() as u32, 0));

    blob
}

/// Scenario 2 + 3: class-32 header fields, symbol table contents, and the
/// two `.rel.text` entries.
#[test]
fn crtbegin_like_class32_header_and_symbols() {
    let blob = crtbegin_like_class32();
    let file = ElfFile::decode(blob, Some("crtbegin.o".to_string())).expect("decodes");

    assert_eq!(file.header.class, ElfClass::Elf32);
    assert_eq!(file.header.data, Endian::Little);
    assert_eq!(file.header.e_type, ET_REL);
    assert_eq!(file.header.machine, EM_386);
    assert_eq!(file.header.ehsize, 52);
    assert_eq!(file.header.shentsize, 40);
    assert_eq!(file.header.phnum, 0);
    assert!(file.program_headers.is_empty());

    let symtab = nacl_ld::elf::SymbolTable::decode(
        &file.data,
        file.header.class,
        file.header.data,
        &file.section_headers,
        file.name.as_deref(),
    )
    .expect("symtab decodes");

    let init_irt = symtab.get(0x0f).unwrap();
    assert_eq!(init_irt.name, "__pnacl_init_irt");
    assert!(init_irt.is_undefined());
    assert_eq!(init_irt.value, 0);

    let wrapper_start = symtab.get(0x10).unwrap();
    assert_eq!(wrapper_start.name, "_pnacl_wrapper_start");
    assert!(wrapper_start.is_undefined());
    assert_eq!(wrapper_start.value, 0);

    let pnacl_start = symtab.get(17).unwrap();
    assert_eq!(pnacl_start.name, "__pnacl_start");
    assert!(!pnacl_start.is_undefined());
    let text_section_index = file
        .section_headers
        .iter()
        .position(|sh| sh.name == ".text")
        .unwrap();
    assert_eq!(pnacl_start.shndx as usize, text_section_index);

    let rel_text_index = file
        .section_headers
        .iter()
        .position(|sh| sh.name == ".rel.text")
        .unwrap();
    let entries = file.read_rel32(rel_text_index).expect("rel32 decodes");
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].r_offset, 0x00bc);
    assert_eq!(entries[0].symbol(), 0x0f);
    assert_eq!(entries[0].kind(), R_386_PC32 as u32);
    assert_eq!(symtab.get(entries[0].symbol() as usize).unwrap().name, "__pnacl_init_irt");

    assert_eq!(entries[1].r_offset, 0x00c4);
    assert_eq!(entries[1].symbol(), 0x10);
    assert_eq!(symtab.get(entries[1].symbol() as usize).unwrap().name, "_pnacl_wrapper_start");
}

/// Builds the class-64 counterpart with a `.rela.text` carrying the
/// three entries from spec.md scenario 4.
fn crtbegin_like_class64() -> Vec<u8> {
    const EHSIZE: usize = 64;
    const SHENTSIZE: usize = 64;

    let mut strtab = vec![0u8];
    let pnacl_start_name = push_name(&mut strtab, "__pnacl_start");
    let init_irt_name = push_name(&mut strtab, "__pnacl_init_irt");
    let wrapper_start_name = push_name(&mut strtab, "_pnacl_wrapper_start");

    let mut symtab = Vec::new();
    let push_entry = |symtab: &mut Vec<u8>, name_index: u32, info: u8, shndx: u16, value: u64| {
        symtab.extend(name_index.to_le_bytes());
        symtab.push(info);
        symtab.push(0);
        symtab.extend(shndx.to_le_bytes());
        symtab.extend(value.to_le_bytes());
        symtab.extend(0u64.to_le_bytes()); // size
    };
    push_entry(&mut symtab, 0, 0, 0, 0); // entry 0
    push_entry(&mut symtab, 0, 0, 0, 0); // entry 1 padding
    push_entry(&mut symtab, 0, 0, 0, 0); // entry 2 padding
    push_entry(&mut symtab, pnacl_start_name, 0x12, 1, 0); // entry 3: defined, sym=3 in first reloc
    push_entry(&mut symtab, init_irt_name, 0x10, 0, 0); // entry 4: undefined
    push_entry(&mut symtab, wrapper_start_name, 0x10, 0, 0); // entry 5: undefined

    let mut rela_text = Vec::new();
    // sym = 3, type = R_X86_64_32S (0x0b), addend = 0xc0
    rela_text.extend(0u64.to_le_bytes()); // r_offset
    rela_text.extend(0x0003_0000_000bu64.to_le_bytes()); // r_info
    rela_text.extend(0xc0i64.to_le_bytes());
    // sym = 4 (__pnacl_init_irt), type = R_X86_64_PC32 (2), addend = -4
    rela_text.extend(4u64.to_le_bytes());
    rela_text.extend(((4u64 << 32) | 2).to_le_bytes());
    rela_text.extend((-4i64).to_le_bytes());
    // sym = 5 (_pnacl_wrapper_start), type = R_X86_64_PC32 (2), addend = -4
    rela_text.extend(8u64.to_le_bytes());
    rela_text.extend(((5u64 << 32) | 2).to_le_bytes());
    rela_text.extend((-4i64).to_le_bytes());

    let shstrtab = b"\0.text\0.rela.text\0.symtab\0.strtab\0.shstrtab\0";
    let text_name = 1u32;
    let rela_text_name = 7u32;
    let symtab_name = 18u32;
    let strtab_name = 26u32;
    let shstrtab_name = 34u32;

    let rela_text_off = EHSIZE;
    let symtab_off = rela_text_off + rela_text.len();
    let strtab_off = symtab_off + symtab.len();
    let shstrtab_off = strtab_off + strtab.len();
    let shnum = 6usize;
    let sh_table_off = shstrtab_off + shstrtab.len();

    let mut blob = vec![0u8; EHSIZE];
    blob[0..4].copy_from_slice(b"\x7fELF");
    blob[4] = 2; // class64
    blob[5] = 1; // LSB
    blob[6] = 1;
    blob[16..18].copy_from_slice(&ET_REL.to_le_bytes());
    blob[18..20].copy_from_slice(&EM_X86_64.to_le_bytes());
    blob[20..24].copy_from_slice(&1u32.to_le_bytes());
    blob[40..48].copy_from_slice(&(sh_table_off as u64).to_le_bytes()); // shoff
    blob[52..54].copy_from_slice(&(EHSIZE as u16).to_le_bytes()); // ehsize
    blob[56..58].copy_from_slice(&0u16.to_le_bytes()); // phnum
    blob[58..60].copy_from_slice(&(SHENTSIZE as u16).to_le_bytes());
    blob[60..62].copy_from_slice(&(shnum as u16).to_le_bytes());
    blob[62..64].copy_from_slice(&5u16.to_le_bytes()); // shstrndx

    blob.extend(&rela_text);
    blob.extend(&symtab);
    blob.extend(&strtab);
    blob.extend(shstrtab);

    let section = |name_idx: u32, sh_type: u32, offset: u64, size: u64, link: u32| {
        let mut h = vec![0u8; SHENTSIZE];
        h[0..4].copy_from_slice(&name_idx.to_le_bytes());
        h[4..8].copy_from_slice(&sh_type.to_le_bytes());
        h[24..32].copy_from_slice(&offset.to_le_bytes());
        h[32..40].copy_from_slice(&size.to_le_bytes());
        h[40..44].copy_from_slice(&link.to_le_bytes());
        h
    };

    blob.extend(section(0, 0, 0, 0, 0));
    blob.extend(section(text_name, 1, 0, 0, 0));
    blob.extend(section(rela_text_name, SHT_RELA, rela_text_off as u64, rela_text.len() as u64, 3));
    blob.extend(section(symtab_name, SHT_SYMTAB, symtab_off as u64, symtab.len() as u64, 4));
    blob.extend(section(strtab_name, SHT_STRTAB, strtab_off as u64, strtab.len() as u64, 0));
    blob.extend(section(shstrtab_name, SHT_STRTAB, shstrtab_off as u64, shstrtab.len() as u64, 0));

    blob
}

/// Scenario 4: the class-64 `.rela.text` with three entries.
#[test]
fn crtbegin_like_class64_rela_entries() {
    let blob = crtbegin_like_class64();
    let file = ElfFile::decode(blob, Some("crtbegin64.o".to_string())).expect("decodes");
    assert_eq!(file.header.class, ElfClass::Elf64);
    assert_eq!(file.header.machine, EM_X86_64);

    let symtab = nacl_ld::elf::SymbolTable::decode(
        &file.data,
        file.header.class,
        file.header.data,
        &file.section_headers,
        file.name.as_deref(),
    )
    .unwrap();

    let rela_index = file
        .section_headers
        .iter()
        .position(|sh| sh.name == ".rela.text")
        .unwrap();
    let entries = file.read_rela64(rela_index).expect("rela64 decodes");
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].symbol(), 3);
    assert_eq!(entries[0].kind(), R_X86_64_32S as u64);
    assert_eq!(entries[0].r_addend, 0xc0);

    assert_eq!(entries[1].kind(), R_X86_64_PC32 as u64);
    assert_eq!(entries[1].r_addend, -4);
    assert_eq!(symtab.get(entries[1].symbol() as usize).unwrap().name, "__pnacl_init_irt");

    assert_eq!(entries[2].r_addend, -4);
    assert_eq!(symtab.get(entries[2].symbol() as usize).unwrap().name, "_pnacl_wrapper_start");
}

/// Scenario 6: the sniffer recognizes a thin-archive magic, and decoding
/// it is a hard failure rather than an attempt to read embedded members.
#[test]
fn thin_archive_is_recognized_then_rejected() {
    let blob = b"!<thin>\n".to_vec();
    assert_eq!(sniff(&blob, Some("libthin.a")).unwrap(), FileType::ThinAr);

    let err = ArFile::decode(&blob, Some("libthin.a"));
    assert!(matches!(err, Err(Error::UnsupportedThinArchive { .. })));
}
