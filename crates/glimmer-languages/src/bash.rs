use glimmer::{
    def::{Child, EndGuard, Keywords, LanguageDef, ModeDef},
    modes::{shebang, Common},
};

const BUILT_INS: &str = "break cd continue eval exec exit export getopts hash pwd readonly return \
    shift test times trap umask unset alias bind builtin caller command declare echo enable help \
    let local logout mapfile printf read readarray source type typeset ulimit unalias set shopt \
    autoload bg bindkey bye cap chdir clone comparguments compcall compctl compdescribe compfiles \
    compgroups compquote comptags comptry compvalues dirs disable disown echotc echoti emulate fc \
    fg float functions getcap getln history integer jobs kill limit log noglob popd print pushd \
    pushln rehash sched setcap setopt stat suspend ttyctl unfunction unhash unlimit unsetopt vared \
    wait whence where which zcompile zformat zftp zle zmodload zparseopts zprof zpty zregexparse \
    zsocket zstyle ztcp";

pub fn bash() -> LanguageDef {
    let mut def = LanguageDef::new("Bash").aliases(&["sh", "zsh"]);
    let common = Common::add_to(&mut def);

    // variables, substitutions and strings nest in each other
    let variable = def.add(ModeDef::new());
    let string = def.add(ModeDef::new());

    let default_value = def.add(ModeDef::new().begin(":-").contains([variable]));
    let braced = ModeDef::new().scope("variable");
    *def.mode_mut(variable) = braced.clone().variants(vec![
        braced.clone().begin(r"\$[\w#@]\w*"),
        braced
            .clone()
            .begin(r"\$\{")
            .end(r"\}")
            .contains([Child::SelfRef, default_value.into()]),
    ]);

    let subst = def.add(
        ModeDef::span("subst", r"\$\(", r"\)").contains([common.backslash_escape, string]),
    );
    *def.mode_mut(string) = ModeDef::span("string", "\"", "\"")
        .contains([common.backslash_escape, variable, subst]);

    let radix_number = def.add(ModeDef::token("number", r"\d+#[0-9a-f]+"));
    let arithmetic = def.add(
        ModeDef::new()
            .begin(r"\$\(\(")
            .end(r"\)\)")
            .contains([radix_number, common.number, variable]),
    );

    let interpreter = def.add(
        shebang(Some("(fish|bash|zsh|sh|csh|ksh|tcsh|dash|scsh)")).relevance(10),
    );
    let any_shebang = def.add(shebang(None));

    let function_name = def.add(ModeDef::token("title", r"\w[\w\d_]*").relevance(0));
    let function = def.add(
        ModeDef::new()
            .scope("function")
            .begin(r"\w[\w\d_]*\s*\(\s*\)\s*\{")
            .flags(|f| f.return_begin = true)
            .relevance(0)
            .contains([function_name]),
    );

    // the body runs until a word equal to the one naming the heredoc
    let heredoc_body = def.add(ModeDef {
        end_guard: Some(EndGuard::SameCaptureAsBegin),
        ..ModeDef::span("string", r"(\w+)", r"(\w+)")
    });
    let heredoc = def.add(ModeDef::new().begin(r"<<-?\s*").contains([heredoc_body]));

    let escaped_quote = def.add(ModeDef::new().begin(r#"\\""#));
    let apos_string = def.add(ModeDef::span("string", "'", "'"));

    let root = def.root_mut();
    root.keywords = Some(
        Keywords::new()
            .pattern(r"\b[a-z._-]+\b")
            .category("keyword", "if then else elif fi for while in do done case esac function")
            .category("literal", "true false")
            .category("built_in", BUILT_INS),
    );
    root.contains = [
        interpreter,
        any_shebang,
        function,
        arithmetic,
        common.hash_comment,
        heredoc,
        string,
        escaped_quote,
        apos_string,
        variable,
    ]
    .map(Child::from)
    .to_vec();
    def
}
