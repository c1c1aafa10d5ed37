//! Directory growth and relocation tests

mod common;

use common::builder::{BITMAP_BLOCK, ROOT_BLOCK};
use common::{mount, options, record_at, ImageBuilder};
use redsea::RedSea;

#[test]
fn test_root_relocation() {
    let mut fs = mount(ImageBuilder::new().file("/A.TXT", 100, b"0123456789").build());

    // Slots 3 to 6 are free; slot 7 stays as terminator
    for name in ["F1", "F2", "F3", "F4"] {
        fs.create(&format!("/{}", name)).unwrap();
    }
    assert_eq!(fs.volume().root_block, ROOT_BLOCK);
    assert_eq!(fs.frontier(), 105);

    fs.create("/F5").unwrap();
    assert_eq!(fs.volume().root_block, 105);
    assert_eq!(fs.volume().root_size, 1024);

    let root = fs.attributes("/").unwrap();
    assert_eq!(root.block, 105);
    assert_eq!(root.size, 1024);

    let own = record_at(&mut fs, 105 * 512);
    assert_eq!(own.name, ".");
    assert_eq!((own.block, own.size), (105, 1024));
    let up = record_at(&mut fs, 105 * 512 + 64);
    assert_eq!(up.name, "..");
    assert_eq!(up.block, 105);

    let f5 = record_at(&mut fs, 105 * 512 + 7 * 64);
    assert_eq!(f5.name, "F5");
    assert_eq!(f5.block, 107);
    assert_eq!(fs.frontier(), 108);

    assert_eq!(
        fs.list("/").unwrap(),
        vec!["A.TXT", "F1", "F2", "F3", "F4", "F5"]
    );
    assert_eq!(fs.read("/A.TXT", 10, 0).unwrap(), b"0123456789");

    let device = fs.finalize().unwrap();
    for descriptor in [0x8000usize, 0x9000] {
        assert_eq!(device.u32_le(descriptor + 0x98), 105);
        assert_eq!(device.u32_be(descriptor + 0x9C), 105);
    }
    assert_eq!(device.u64_le((BITMAP_BLOCK * 512) as usize + 0x18), 105);

    let fs = RedSea::mount(device, options()).unwrap();
    assert_eq!(fs.volume().root_block, 105);
    assert_eq!(fs.list("/").unwrap().len(), 6);
}

#[test]
fn test_directory_relocation_patches_children() {
    let device = ImageBuilder::new()
        .dir("/Home", 110, 512)
        .dir("/Home/Sub", 111, 512)
        .file("/Home/Sub/Deep.HC", 112, b"deep")
        .build();
    let mut fs = mount(device);
    assert_eq!(fs.frontier(), 113);

    for i in 1..=4 {
        fs.create(&format!("/Home/F{}", i)).unwrap();
    }
    assert_eq!(fs.attributes("/Home").unwrap().block, 110);

    fs.create("/Home/F5").unwrap();

    // Home moved to the frontier with one extra block
    let home = fs.attributes("/Home").unwrap();
    assert_eq!(home.block, 117);
    assert_eq!(home.size, 1024);

    let record = record_at(&mut fs, ROOT_BLOCK * 512 + 2 * 64);
    assert_eq!(record.name, "Home");
    assert_eq!((record.block, record.size), (117, 1024));

    let own = record_at(&mut fs, 117 * 512);
    assert_eq!((own.block, own.size), (117, 1024));

    // Sub's ".." follows its parent
    let up = record_at(&mut fs, 111 * 512 + 64);
    assert_eq!(up.name, "..");
    assert_eq!(up.block, 117);

    assert!(record_at(&mut fs, 117 * 512 + 8 * 64).is_terminator());
    assert_eq!(fs.read("/Home/Sub/Deep.HC", 4, 0).unwrap(), b"deep");

    let device = fs.finalize().unwrap();
    let mut fs = RedSea::mount(device, options()).unwrap();
    assert_eq!(
        fs.list("/Home").unwrap(),
        vec!["Sub", "F1", "F2", "F3", "F4", "F5"]
    );
    assert_eq!(fs.read("/Home/Sub/Deep.HC", 4, 0).unwrap(), b"deep");
}

#[test]
fn test_tombstones_fill_before_growth() {
    let mut fs = mount(ImageBuilder::new().file("/A.TXT", 100, b"a").build());
    for name in ["F1", "F2", "F3", "F4"] {
        fs.create(&format!("/{}", name)).unwrap();
    }
    fs.unlink("/F2").unwrap();

    fs.create("/F5").unwrap();
    assert_eq!(fs.volume().root_block, ROOT_BLOCK);
    assert_eq!(record_at(&mut fs, ROOT_BLOCK * 512 + 4 * 64).name, "F5");
}
