use chip8_core::{Chip8, Config, Keys};
use proptest::prelude::*;

/// A seeded machine with `program` at 0x200
fn boot(program: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::new(Config::default().with_seed(0)).unwrap();
    chip8.load_program(program).unwrap();
    chip8
}

fn step(chip8: &mut Chip8) {
    chip8.step(&mut Keys::new()).unwrap();
}

proptest! {
    #[test]
    fn add_immediate_wraps(x in 0u8..0xF, vx in any::<u8>(), kk in any::<u8>()) {
        let mut chip8 = boot(&[0x70 | x, kk]);
        chip8.state_mut().set_v(x, vx);
        chip8.state_mut().set_v(0xF, 0xAB);
        step(&mut chip8);
        let sum = (u16::from(vx) + u16::from(kk)) % 256;
        prop_assert_eq!(u16::from(chip8.state().v(x)), sum);
        prop_assert_eq!(chip8.state().flag(), 0xAB);
    }

    #[test]
    fn add_with_carry(vx in any::<u8>(), vy in any::<u8>()) {
        // ADD V1, V2
        let mut chip8 = boot(&[0x81, 0x24]);
        chip8.state_mut().set_v(0x1, vx);
        chip8.state_mut().set_v(0x2, vy);
        step(&mut chip8);
        let sum = u16::from(vx) + u16::from(vy);
        prop_assert_eq!(chip8.state().flag(), u8::from(sum > 255));
        prop_assert_eq!(u16::from(chip8.state().v(0x1)), sum % 256);
    }

    #[test]
    fn subtract_with_borrow(vx in any::<u8>(), vy in any::<u8>()) {
        // SUB V1, V2
        let mut chip8 = boot(&[0x81, 0x25]);
        chip8.state_mut().set_v(0x1, vx);
        chip8.state_mut().set_v(0x2, vy);
        step(&mut chip8);
        prop_assert_eq!(chip8.state().flag(), u8::from(vx >= vy));
        let diff = (i16::from(vx) - i16::from(vy)).rem_euclid(256);
        prop_assert_eq!(i16::from(chip8.state().v(0x1)), diff);
    }

    #[test]
    fn drawing_twice_restores_the_frame(
        background in proptest::collection::vec(any::<u8>(), 1..=15),
        sprite in proptest::collection::vec(any::<u8>(), 1..=15),
        origin in any::<(u8, u8)>(),
        target in any::<(u8, u8)>(),
    ) {
        let (nb, n) = (background.len() as u8, sprite.len() as u8);
        let mut chip8 = boot(&[
            0xA3, 0x00, // LD I, 0x300
            0xD4, 0x50 | nb, // DRW V4, V5, nb
            0xA3, 0x20, // LD I, 0x320
            0xD0, 0x10 | n, // DRW V0, V1, n
            0xD0, 0x10 | n, // DRW V0, V1, n
        ]);
        chip8.state_mut().write_range(0x300, &background).unwrap();
        chip8.state_mut().write_range(0x320, &sprite).unwrap();
        chip8.state_mut().set_registers(&[target.0, target.1, 0, 0, origin.0, origin.1]);
        let rows = |chip8: &Chip8| -> Vec<Vec<bool>> {
            chip8.frame().rows().map(<[bool]>::to_vec).collect()
        };

        step(&mut chip8);
        step(&mut chip8);
        let before = rows(&chip8);
        for _ in 0..3 {
            step(&mut chip8);
        }
        prop_assert_eq!(rows(&chip8), before);
    }

    #[test]
    fn separate_sprites_never_collide(x in 0u8..24, y in 0u8..27) {
        // two 8x5 blocks side by side: LD I, 0x300; DRW V0, V1, 5; DRW V2, V1, 5
        let mut chip8 = boot(&[0xA3, 0x00, 0xD0, 0x15, 0xD2, 0x15]);
        chip8.state_mut().write_range(0x300, &[0xFF; 5]).unwrap();
        chip8.state_mut().set_v(0x0, x);
        chip8.state_mut().set_v(0x1, y);
        chip8.state_mut().set_v(0x2, x + 8);
        for _ in 0..3 {
            step(&mut chip8);
        }
        prop_assert_eq!(chip8.state().flag(), 0);
        prop_assert_eq!(chip8.frame().lit(), 80);
    }

    #[test]
    fn overlapping_sprites_collide(x in any::<u8>(), y in any::<u8>(), dx in 0u8..8, dy in 0u8..5) {
        let mut chip8 = boot(&[0xA3, 0x00, 0xD0, 0x15, 0xD2, 0x35]);
        chip8.state_mut().write_range(0x300, &[0xFF; 5]).unwrap();
        chip8.state_mut().set_v(0x0, x);
        chip8.state_mut().set_v(0x1, y);
        chip8.state_mut().set_v(0x2, x.wrapping_add(dx));
        chip8.state_mut().set_v(0x3, y.wrapping_add(dy));
        for _ in 0..3 {
            step(&mut chip8);
        }
        prop_assert_eq!(chip8.state().flag(), 1);
    }
}
