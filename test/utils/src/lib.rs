pub fn story_fixture() -> &'static str {
    return r#"
Title: The Lighthouse at Grey Point

Mara had kept the lamp burning for eleven winters, and in all that time the sea had never once knocked on her door.

"You hear that?" she asked the cat. The cat did not answer, which was the cat's way.

By morning the knocking had a name, and the name was Tomas.
"#
    .trim();
}

pub fn heading_story_fixture() -> &'static str {
    return r#"

## **The Clockwork Garden**

Every gear in Ilse's garden turned toward the sun.
"#;
}

pub fn untitled_story_fixture() -> &'static str {
    return "#\n\nThe rain had opinions, and tonight it was sharing all of them.";
}

pub fn revised_story_fixture() -> &'static str {
    return r#"
Mara had kept the lamp burning for eleven winters, and in all that time the sea had never once knocked on her door.

By morning the knocking had a name, and the name was Tomas, and he stayed for supper.
"#
    .trim();
}
