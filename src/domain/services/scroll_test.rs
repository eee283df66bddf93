use super::Scroll;

fn scroll(list_length: u16, viewport_length: u16) -> Scroll {
    let mut scroll = Scroll::default();
    scroll.set_state(list_length, viewport_length);
    return scroll;
}

#[test]
fn it_stays_put_when_everything_fits() {
    let mut scroll = scroll(5, 20);
    scroll.down();
    scroll.down_page();
    assert_eq!(scroll.position, 0);

    scroll.last();
    assert_eq!(scroll.position, 0);
}

#[test]
fn it_scrolls_within_bounds() {
    let mut scroll = scroll(30, 10);
    scroll.up();
    assert_eq!(scroll.position, 0);

    scroll.down();
    scroll.down();
    assert_eq!(scroll.position, 2);

    scroll.down_page();
    scroll.down_page();
    assert_eq!(scroll.position, 20);

    scroll.up_page();
    assert_eq!(scroll.position, 10);

    scroll.up();
    assert_eq!(scroll.position, 9);
}

#[test]
fn it_jumps_to_the_last_page() {
    let mut scroll = scroll(30, 10);
    scroll.last();
    assert_eq!(scroll.position, 20);
}

#[test]
fn it_clamps_when_the_list_shrinks() {
    let mut scroll = scroll(30, 10);
    scroll.last();

    scroll.set_state(15, 10);
    assert_eq!(scroll.position, 5);
}
